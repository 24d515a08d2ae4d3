//! `Constant` table (0x0B), compile time values of fields, parameters and properties.
//!
//! A row stores the element type of the value and a blob with its little-endian bytes. The
//! winmd uses it for every literal constant of the `Apis` classes and for the members of enums.
//! Decoding the blob into a value is done by [`crate::metadata::constants`].
//!
//! # Reference
//! - [ECMA-335 II.22.9](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
