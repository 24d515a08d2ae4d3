//! `Param` table (0x08).
//!
//! # Reference
//! - [ECMA-335 II.22.33](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
