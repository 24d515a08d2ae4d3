//! CLR runtime header (ECMA-335 II.25.3.3).

use crate::{file::parser::Parser, Result};

/// The CLR runtime header found through the `IMAGE_DIRECTORY_ENTRY_COM_DESCRIPTOR` data
/// directory. Only the fields needed to locate the metadata are kept.
pub struct Cor20Header {
    /// Size of header in bytes, always 72
    pub cb: u32,
    /// The minimum version of runtime required
    pub major_runtime_version: u16,
    /// The minor portion of the version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata
    pub meta_data_size: u32,
    /// Runtime flags
    pub flags: u32,
}

impl Cor20Header {
    /// Read the header at the start of `data`
    ///
    /// # Errors
    /// Returns an error if the data is too short, the size field is not 72, or the metadata
    /// directory is empty
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < 72 {
            return Err(out_of_bounds_error!());
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb != 72 {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        }

        let flags = parser.read_le::<u32>()?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = {
            let mut data = vec![0x00; 72];
            data[0..4].copy_from_slice(&[0x48, 0x00, 0x00, 0x00]);
            data[4..8].copy_from_slice(&[0x02, 0x00, 0x05, 0x00]);
            data[8..12].copy_from_slice(&[0x50, 0x20, 0x00, 0x00]);
            data[12..16].copy_from_slice(&[0x00, 0x01, 0x00, 0x00]);
            data[16..20].copy_from_slice(&[0x01, 0x00, 0x00, 0x00]);
            data
        };

        let header = Cor20Header::read(&header_bytes).unwrap();
        assert_eq!(header.cb, 72);
        assert_eq!(header.major_runtime_version, 2);
        assert_eq!(header.minor_runtime_version, 5);
        assert_eq!(header.meta_data_rva, 0x2050);
        assert_eq!(header.meta_data_size, 0x100);
        assert_eq!(header.flags, 1);
    }

    #[test]
    fn invalid() {
        assert!(Cor20Header::read(&[0x48; 10]).is_err());

        let mut header_bytes = vec![0x00; 72];
        header_bytes[0] = 0x48;
        assert!(Cor20Header::read(&header_bytes).is_err());
    }
}
