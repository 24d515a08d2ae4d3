use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `GenericParam` table
#[derive(Clone, Debug)]
pub struct GenericParamRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x2A` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Index of the parameter
    pub number: u16,
    /// `GenericParamAttributes` bitmask
    pub flags: u16,
    /// `TypeOrMethodDef` coded index of the owner
    pub owner: CodedIndex,
    /// Index into `#Strings`
    pub name: u32,
}
