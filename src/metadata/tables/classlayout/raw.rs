use crate::metadata::token::Token;

/// A row of the `ClassLayout` table
#[derive(Clone, Debug)]
pub struct ClassLayoutRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x0F` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Field alignment, 0 for the platform default
    pub packing_size: u16,
    /// Total size in bytes, 0 if not given
    pub class_size: u32,
    /// The type this layout applies to
    pub parent: u32,
}
