use crate::metadata::token::Token;

/// A row of the `PropertyMap` table
#[derive(Clone, Debug)]
pub struct PropertyMapRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x15` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// The owning type
    pub parent: u32,
    /// First owned row of the `Property` table
    pub property_list: u32,
}
