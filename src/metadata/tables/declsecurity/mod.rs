//! `DeclSecurity` table (0x0E), only counted, a winmd never carries declarative security.

mod raw;
mod reader;

pub use raw::*;
