//! Metadata streams of a winmd.
//!
//! A winmd carries the usual compressed stream set:
//!
//! - **`#~`** - the metadata tables, see [`TablesHeader`]
//! - **`#Strings`** - NUL terminated UTF-8 identifiers, see [`Strings`]
//! - **`#Blob`** - length prefixed signatures, constant values and attribute arguments, see [`Blob`]
//! - **`#GUID`** - 16 byte GUIDs, see [`Guid`]
//! - **`#US`** - user strings of IL method bodies, present but never read
//!
//! The uncompressed `#-` table stream is recognized and rejected.
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2.2 - Stream Headers

mod blob;
mod guid;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use guid::Guid;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
