//! Metadata root header and stream directory (ECMA-335 II.24.2.1).
//!
//! The root is the first structure at the metadata RVA named by the CLR header. It carries a
//! version string and the directory of streams, each addressed relative to the root itself.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::NotSupported,
    Result,
};

/// The magic value that starts every metadata root (`BSJB`)
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// The metadata root and its stream directory.
///
/// ```rust
/// use win32json::metadata::root::Root;
///
/// let root = Root::read(&[
///            0x42, 0x53, 0x4A, 0x42,
///            0x01, 0x00,
///            0x01, 0x00,
///            0x00, 0x00, 0x00, 0x00,
///            0x04, 0x00, 0x00, 0x00,
///            b'v', b'4', b'.', 0x00,
///            0x00, 0x00,
///            0x01, 0x00,
///            0x20, 0x00, 0x00, 0x00, // StreamHeader
///            0x04, 0x00, 0x00, 0x00,
///            0x23, 0x7E, 0x00, 0x00,
///            0x00, 0x00, 0x00, 0x00,
///        ])?;
/// assert_eq!(root.version, "v4.");
/// assert_eq!(root.stream_headers[0].name, "#~");
/// # Ok::<(), win32json::Error>(())
/// ```
pub struct Root {
    /// Magic signature, always [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// `MajorVersion`
    pub major_version: u16,
    /// `MinorVersion`
    pub minor_version: u16,
    /// Version string, without padding
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// The stream directory
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Read the metadata root at the start of `data`
    ///
    /// # Errors
    /// Returns an error if the signature is wrong, the directory is damaged, a stream exceeds
    /// `data`, or the uncompressed `#-` table stream is used
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(out_of_bounds_error!());
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {}",
                signature
            ));
        }

        let version_length = read_le_at::<u32>(data, &mut 12)? as usize;
        let Some(version_end) = version_length.checked_add(16) else {
            return Err(malformed_error!(
                "Version string length causing integer overflow - {}",
                version_length
            ));
        };
        if version_end + 4 > data.len() {
            return Err(out_of_bounds_error!());
        }

        let version = data[16..version_end]
            .iter()
            .take_while(|byte| **byte != 0)
            .map(|byte| char::from(*byte))
            .collect::<String>();

        let flags = read_le::<u16>(&data[version_end..])?;
        let stream_count = read_le::<u16>(&data[version_end + 2..])?;
        if stream_count == 0 || stream_count > 6 {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut stream_headers: Vec<StreamHeader> = Vec::with_capacity(stream_count as usize);
        let mut stream_offset = version_end + 4;
        for _ in 0..stream_count {
            let Some(header_data) = data.get(stream_offset..) else {
                return Err(out_of_bounds_error!());
            };

            let header = StreamHeader::from(header_data)?;
            match header.offset.checked_add(header.size) {
                Some(end) if end as usize <= data.len() => {}
                Some(_) => return Err(out_of_bounds_error!()),
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        header.offset,
                        header.size
                    ))
                }
            }

            if header.name == "#-" {
                return Err(NotSupported);
            }

            if stream_headers.iter().any(|known| known.name == header.name) {
                return Err(malformed_error!("Duplicate stream - {}", header.name));
            }

            stream_offset += header.header_size();
            stream_headers.push(header);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            version,
            flags,
            stream_headers,
        })
    }

    /// The directory entry of the stream called `name`
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    fn header_bytes(second_stream: &[u8]) -> Vec<u8> {
        let mut data = vec![
            0x42, 0x53, 0x4A, 0x42,
            0x01, 0x00,
            0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x0C, 0x00, 0x00, 0x00,
            b'v', b'4', b'.', b'0', b'.', b'3', b'0', b'3', b'1', b'9', 0x00, 0x00,
            0x00, 0x00,
            0x02, 0x00,
            0x40, 0x00, 0x00, 0x00, // #~
            0x08, 0x00, 0x00, 0x00,
            0x23, 0x7E, 0x00, 0x00,
        ];
        data.extend_from_slice(second_stream);
        data.resize(0x60, 0x00);
        data
    }

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = header_bytes(&[
            0x48, 0x00, 0x00, 0x00, // #Strings
            0x10, 0x00, 0x00, 0x00,
            b'#', b'S', b't', b'r', b'i', b'n', b'g', b's', 0x00, 0x00, 0x00, 0x00,
        ]);

        let root = Root::read(&data).unwrap();
        assert_eq!(root.signature, CIL_HEADER_MAGIC);
        assert_eq!(root.major_version, 1);
        assert_eq!(root.version, "v4.0.30319");
        assert_eq!(root.stream_headers.len(), 2);
        assert_eq!(root.stream("#~").unwrap().offset, 0x40);
        assert_eq!(root.stream("#Strings").unwrap().size, 0x10);
        assert!(root.stream("#Blob").is_none());
    }

    #[test]
    fn uncompressed_tables() {
        #[rustfmt::skip]
        let data = header_bytes(&[
            0x48, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
            0x23, 0x2D, 0x00, 0x00,
        ]);

        assert!(matches!(Root::read(&data), Err(crate::Error::NotSupported)));
    }

    #[test]
    fn invalid() {
        #[rustfmt::skip]
        let data = header_bytes(&[
            0x58, 0x00, 0x00, 0x00, // ends past the data
            0x10, 0x00, 0x00, 0x00,
            0x23, 0x47, 0x55, 0x49, 0x44, 0x00, 0x00, 0x00,
        ]);
        assert!(Root::read(&data).is_err());

        let mut data = header_bytes(&[]);
        data[0] = 0x43;
        assert!(Root::read(&data).is_err());
    }
}
