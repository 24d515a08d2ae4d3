//! Owned-buffer backend, used by [`crate::File::from_mem`] and the fuzz target.

use super::Backend;

/// A winmd image held in a `Vec<u8>`
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Take ownership of `data`
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
    fn data(&self) -> &[u8] {
        &self.data
    }
}
