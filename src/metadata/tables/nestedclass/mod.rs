//! `NestedClass` table (0x29), the declaring type of every nested type.
//!
//! # Reference
//! - [ECMA-335 II.22.32](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
