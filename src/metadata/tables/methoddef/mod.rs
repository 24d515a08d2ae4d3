//! `MethodDef` table (0x06).
//!
//! Parameters follow the same run-length scheme as the members of a type: `param_list` is the
//! first owned `Param` row and the list ends where the next method's list starts.
//!
//! # Reference
//! - [ECMA-335 II.22.26](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
