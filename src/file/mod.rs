//! PE container access for winmd files.
//!
//! A winmd is a PE image whose only interesting content is the CLR runtime header and the
//! metadata it points to. [`File`] parses the PE headers with `goblin`, checks that a CLR header
//! is present, and offers the address translation needed to locate the metadata root.

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

use crate::{
    Error::{Empty, GoblinErr},
    Result,
};

/// Backend trait for file data sources.
///
/// Allows a winmd to be read either from a memory map or from an owned buffer.
pub trait Backend: Send + Sync {
    /// The complete image
    fn data(&self) -> &[u8];

    /// Image size in bytes
    fn len(&self) -> usize {
        self.data().len()
    }

    /// `len` bytes starting at `offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range leaves the image
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data().get(offset..end))
            .ok_or_else(|| out_of_bounds_error!())
    }
}

#[self_referencing]
/// A loaded PE file that carries a CLR runtime header.
///
/// ```rust,no_run
/// use win32json::File;
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("Windows.Win32.winmd"))?;
/// let (clr_rva, clr_size) = file.clr();
/// println!("CLR header at RVA 0x{clr_rva:x} ({clr_size} bytes)");
/// # Ok::<(), win32json::Error>(())
/// ```
pub struct File {
    data: Box<dyn Backend>,
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Memory-map and parse the file at `file`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a PE file, or has no CLR header
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Parse a PE image held in memory
    ///
    /// # Errors
    /// Returns an error if the data is not a PE file or has no CLR header
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| {
            let data = data.as_ref();
            match PE::parse(data.data()) {
                Ok(pe) => match pe.header.optional_header {
                    Some(optional_header) => {
                        if optional_header
                            .data_directories
                            .get_clr_runtime_header()
                            .is_none()
                        {
                            Err(malformed_error!(
                                "File does not have a CLR runtime header directory"
                            ))
                        } else {
                            Ok(pe)
                        }
                    }
                    None => Err(malformed_error!("File does not have an OptionalHeader")),
                },
                Err(error) => Err(GoblinErr(error)),
            }
        })
    }

    /// Total size of the image in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_data(|data| data.len())
    }

    /// Returns `true` if the image is empty (never the case for a loaded file)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The complete image
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// A bounds-checked slice of the image
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range leaves the image
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// RVA and size of the CLR runtime header, `(0, 0)` if absent
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            let Some(optional_header) = pe.header.optional_header else {
                return (0, 0);
            };

            match optional_header.data_directories.get_clr_runtime_header() {
                Some(clr) => (clr.virtual_address as usize, clr.size as usize),
                None => (0, 0),
            }
        })
    }

    /// Translate a relative virtual address to a file offset using the section table
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no section contains `rva`
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 = u32::try_from(rva)
            .map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let extent = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(extent) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        extent
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
