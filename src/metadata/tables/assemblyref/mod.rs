//! `AssemblyRef` table (0x23).
//!
//! The winmd references `netstandard` (or `mscorlib`) for the runtime types it uses, and
//! `Windows.Foundation.UniversalApiContract` style assemblies for the handful of WinRT types
//! that leak into the Win32 surface.

mod raw;
mod reader;

pub use raw::*;
