use crate::metadata::token::Token;

/// A row of the `Param` table, sequence 0 describes the return value
#[derive(Clone, Debug)]
pub struct ParamRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x08` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// `ParamAttributes` bitmask
    pub flags: u32,
    /// Position of the parameter, 0 for the return value
    pub sequence: u32,
    /// Index into `#Strings`
    pub name: u32,
}
