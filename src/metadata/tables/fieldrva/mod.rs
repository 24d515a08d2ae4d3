//! `FieldRVA` table (0x1D), initial data of static fields.

mod raw;
mod reader;

pub use raw::*;
