use crate::metadata::token::Token;

/// A row of the `EventMap` table
#[derive(Clone, Debug)]
pub struct EventMapRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x12` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// The owning type
    pub parent: u32,
    /// First owned row of the `Event` table
    pub event_list: u32,
}
