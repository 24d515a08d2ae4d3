//! `TypeDef` table (0x02), the type definitions of the module.
//!
//! Fields and methods are not stored per type. `field_list` and `method_list` name the first
//! row owned by a type and the list runs up to the first row of the next type (or the end of
//! the table for the last type), so the owner of a member is only known after looking at the
//! following row.
//!
//! # Reference
//! - [ECMA-335 II.22.37](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
