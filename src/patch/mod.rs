//! Corrections for known defects in the winmd.
//!
//! The published metadata has a few errors that consumers would otherwise work around one by one:
//! missing `Optional` markers, a constant defined twice, structs that reference types they
//! cannot name. A [`PatchConfig`] lists the corrections, the [`PatchOverlay`] built from it is
//! consulted while classifying, and [`PatchOverlay::validate`] fails the run once a correction no
//! longer applies, so fixes made upstream surface instead of being masked.

mod config;
mod overlay;

pub use config::{
    ComTypePatchConfig, ConstPatchConfig, FieldPatchConfig, FuncPatchConfig, InApi,
    ParamPatchConfig, PatchConfig, ReturnTypePatchConfig, TypePatchConfig,
};
pub use overlay::{
    ApiPatch, ConstPatch, FieldPatch, FuncPatch, ParamPatch, PatchCounters, PatchId, PatchOverlay,
    ReturnTypePatch, TypePatch,
};
