//! `FieldLayout` table (0x10), offsets of fields of explicit layout types.

mod raw;
mod reader;

pub use raw::*;
