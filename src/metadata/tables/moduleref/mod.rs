//! `ModuleRef` table (0x1A), the DLLs functions are imported from.

mod raw;
mod reader;

pub use raw::*;
