//! `TypeRef` table (0x01), references to types defined elsewhere.
//!
//! In a winmd every cross-namespace use of a type is a `TypeRef` with a `Module` scope, nested
//! types are referenced through a `TypeRef` scope pointing at the enclosing reference, and the
//! few types taken from the runtime (`System.Guid`, attribute classes) use an `AssemblyRef`
//! scope.
//!
//! # Reference
//! - [ECMA-335 II.22.38](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
