use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `Constant` table
#[derive(Clone, Debug)]
pub struct ConstantRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x0B` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Element type of the value (`ELEMENT_TYPE_*`)
    pub base: u8,
    /// `HasConstant` coded index of the owner
    pub parent: CodedIndex,
    /// Index into `#Blob` for the value
    pub value: u32,
}
