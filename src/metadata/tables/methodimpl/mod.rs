//! `MethodImpl` table (0x19), explicit method overrides.

mod raw;
mod reader;

pub use raw::*;
