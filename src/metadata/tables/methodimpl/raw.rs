use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `MethodImpl` table
#[derive(Clone, Debug)]
pub struct MethodImplRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x19` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// The type containing the override
    pub class: u32,
    /// `MethodDefOrRef` coded index of the implementation
    pub method_body: CodedIndex,
    /// `MethodDefOrRef` coded index of the overridden method
    pub method_declaration: CodedIndex,
}
