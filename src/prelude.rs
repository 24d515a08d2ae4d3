//! # win32json Prelude
//!
//! The types needed to load a winmd, run the generator and inspect its results.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all win32json operations
pub use crate::Error;

/// The result type used throughout win32json
pub use crate::Result;

// ================================================================================================
// Metadata
// ================================================================================================

/// Loading winmd files and building metadata in memory
pub use crate::metadata::{builder::MetadataBuilder, winmd::WinMd, MetadataOracle};

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

// ================================================================================================
// Generation
// ================================================================================================

/// One generator run
pub use crate::generator::{GenerateSummary, Generated, Generator, GeneratorOptions};

/// The type graph
pub use crate::typesystem::{ApiGroup, GraphBuilder, TypeGraph, TypeRef};

/// Output records
pub use crate::classify::{ApiRecords, Classifier, TypeKind, TypeRecord};

/// Corrections
pub use crate::patch::{PatchConfig, PatchOverlay};

/// Documents
pub use crate::emit::ApiDocument;
