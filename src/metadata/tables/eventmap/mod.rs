//! `EventMap` table (0x12), maps a type to the run of events it owns.

mod raw;
mod reader;

pub use raw::*;
