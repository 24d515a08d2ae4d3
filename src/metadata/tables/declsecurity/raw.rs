use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `DeclSecurity` table
#[derive(Clone, Debug)]
pub struct DeclSecurityRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x0E` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Security action
    pub action: u16,
    /// `HasDeclSecurity` coded index of the owner
    pub parent: CodedIndex,
    /// Index into `#Blob`
    pub permission_set: u32,
}
