use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `MemberRef` table
#[derive(Clone, Debug)]
pub struct MemberRefRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x0A` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// `MemberRefParent` coded index of the owning type
    pub class: CodedIndex,
    /// Index into `#Strings`
    pub name: u32,
    /// Index into `#Blob` for the member signature
    pub signature: u32,
}
