//! `ClassLayout` table (0x0F), explicit packing and size of value types.

mod raw;
mod reader;

pub use raw::*;
