use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `ImplMap` table
#[derive(Clone, Debug)]
pub struct ImplMapRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x1C` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// `PInvokeAttributes` bitmask
    pub mapping_flags: u32,
    /// `MemberForwarded` coded index, always a `MethodDef` in a winmd
    pub member_forwarded: CodedIndex,
    /// Index into `#Strings` for the entry point
    pub import_name: u32,
    /// The `ModuleRef` of the DLL
    pub import_scope: u32,
}
