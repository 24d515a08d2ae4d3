//! `InterfaceImpl` table (0x09), interfaces implemented or extended by a type.

mod raw;
mod reader;

pub use raw::*;
