//! Shared table infrastructure: table ids, coded indices, index widths and typed row access.

mod codedindex;
mod tableid;
mod tableinfo;

use std::marker::PhantomData;

use crate::Result;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use tableid::{Column, TableId};
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};

/// A row type that can be decoded from a metadata table.
pub trait RowReadable: Sized {
    /// The table this row type belongs to
    const TABLE: TableId;

    /// Size in bytes of one row, given the index widths in `sizes`
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Decode the row at `offset`, which is advanced past it
    ///
    /// # Errors
    /// Returns an error if the row is truncated or contains an invalid coded index
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// A typed, read-only view over the rows of one table.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a view over `row_count` rows starting at the beginning of `data`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is too short for all rows
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        let needed = u64::from(row_count) * u64::from(row_size);
        if needed > data.len() as u64 {
            return Err(out_of_bounds_error!());
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Size of the table in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Decode row `rid` (1-based)
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for row 0 or a row past the end, or any decoding
    /// error of the row itself
    pub fn get(&self, rid: u32) -> Result<T> {
        if rid == 0 || rid > self.row_count {
            return Err(out_of_bounds_error!());
        }

        let mut offset = (rid as usize - 1) * self.row_size as usize;
        T::row_read(self.data, &mut offset, rid, &self.sizes)
    }

    /// Iterate over all rows, stopping at the first row that fails to decode
    #[must_use]
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
        }
    }

    /// Decode every row, failing on the first damaged one
    ///
    /// # Errors
    /// Returns the first decoding error
    pub fn rows(&self) -> Result<Vec<T>> {
        (1..=self.row_count).map(|rid| self.get(rid)).collect()
    }
}

/// Iterator over the rows of a [`MetadataTable`]
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    current_row: u32,
}

impl<T: RowReadable> Iterator for TableIterator<'_, '_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        self.current_row += 1;
        self.table.get(self.current_row).ok()
    }
}
