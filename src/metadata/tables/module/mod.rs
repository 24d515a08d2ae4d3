//! `Module` table (0x00), the single row naming the module and its MVID.

mod raw;
mod reader;

pub use raw::*;
