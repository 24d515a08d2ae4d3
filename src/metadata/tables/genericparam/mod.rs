//! `GenericParam` table (0x2A), only counted, generics never appear in a winmd.

mod raw;
mod reader;

pub use raw::*;
