//! `PropertyMap` table (0x15), maps a type to the run of properties it owns.

mod raw;
mod reader;

pub use raw::*;
