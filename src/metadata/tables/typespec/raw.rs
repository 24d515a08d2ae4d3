use crate::metadata::token::Token;

/// A row of the `TypeSpec` table
#[derive(Clone, Debug)]
pub struct TypeSpecRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x1B` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Index into `#Blob` for the type signature
    pub signature: u32,
}
