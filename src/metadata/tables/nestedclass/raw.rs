use crate::metadata::token::Token;

/// A row of the `NestedClass` table
#[derive(Clone, Debug)]
pub struct NestedClassRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x29` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// The nested type
    pub nested_class: u32,
    /// The declaring type
    pub enclosing_class: u32,
}
