//! `TypeSpec` table (0x1B), constructed types. Only present in a winmd if something went wrong upstream.

mod raw;
mod reader;

pub use raw::*;
