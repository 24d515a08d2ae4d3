//! Metadata tables of the `#~` stream.
//!
//! Only the tables a winmd populates have row types here. Each table module holds a `*Raw` row
//! struct with heap indices and coded indices exactly as stored, and its [`RowReadable`]
//! implementation. Resolving indices into names, signatures and values happens one level up in
//! [`crate::metadata::winmd`].
//!
//! ```rust,no_run
//! use win32json::metadata::{streams::TablesHeader, tables::FieldRaw};
//!
//! # fn stream() -> &'static [u8] { &[] }
//! let tables = TablesHeader::from(stream())?;
//! let fields = tables.table::<FieldRaw>()?;
//! println!("{} fields", fields.row_count());
//! # Ok::<(), win32json::Error>(())
//! ```
//!
//! # Reference
//! - [ECMA-335 II.22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod assemblyref;
mod classlayout;
mod constant;
mod customattribute;
mod declsecurity;
mod eventmap;
mod field;
mod fieldlayout;
mod fieldrva;
mod genericparam;
mod implmap;
mod interfaceimpl;
mod memberref;
mod methoddef;
mod methodimpl;
mod module;
mod moduleref;
mod nestedclass;
mod param;
mod propertymap;
mod typedef;
mod typeref;
mod types;
mod typespec;

pub use assemblyref::*;
pub use classlayout::*;
pub use constant::*;
pub use customattribute::*;
pub use declsecurity::*;
pub use eventmap::*;
pub use field::*;
pub use fieldlayout::*;
pub use fieldrva::*;
pub use genericparam::*;
pub use implmap::*;
pub use interfaceimpl::*;
pub use memberref::*;
pub use methoddef::*;
pub use methodimpl::*;
pub use module::*;
pub use moduleref::*;
pub use nestedclass::*;
pub use param::*;
pub use propertymap::*;
pub use typedef::*;
pub use typeref::*;
pub use types::*;
pub use typespec::*;
