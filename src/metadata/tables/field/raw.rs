use crate::metadata::token::Token;

/// A row of the `Field` table
#[derive(Clone, Debug)]
pub struct FieldRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x04` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// `FieldAttributes` bitmask
    pub flags: u32,
    /// Index into `#Strings`
    pub name: u32,
    /// Index into `#Blob` for the field signature
    pub signature: u32,
}
