use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `InterfaceImpl` table
#[derive(Clone, Debug)]
pub struct InterfaceImplRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x09` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// The implementing type
    pub class: u32,
    /// `TypeDefOrRef` coded index of the interface
    pub interface: CodedIndex,
}
