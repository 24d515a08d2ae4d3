use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `CustomAttribute` table
#[derive(Clone, Debug)]
pub struct CustomAttributeRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x0C` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// `HasCustomAttribute` coded index of the decorated entity
    pub parent: CodedIndex,
    /// `CustomAttributeType` coded index of the constructor
    pub constructor: CodedIndex,
    /// Index into `#Blob` for the argument blob
    pub value: u32,
}
