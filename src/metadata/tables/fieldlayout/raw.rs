use crate::metadata::token::Token;

/// A row of the `FieldLayout` table
#[derive(Clone, Debug)]
pub struct FieldLayoutRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x10` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Byte offset of the field
    pub field_offset: u32,
    /// The field
    pub field: u32,
}
