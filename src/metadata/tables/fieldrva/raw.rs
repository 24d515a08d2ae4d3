use crate::metadata::token::Token;

/// A row of the `FieldRVA` table
#[derive(Clone, Debug)]
pub struct FieldRVARaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x1D` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// RVA of the field data
    pub rva: u32,
    /// The field
    pub field: u32,
}
