use crate::{file::parser::Parser, Result};

/// The `#Blob` heap, length prefixed byte sequences holding signatures, constant values and
/// custom attribute arguments.
///
/// ```rust
/// use win32json::metadata::streams::Blob;
///
/// let data = &[0x00, 0x03, 0x06, 0x08, 0x00];
/// let blob = Blob::from(data)?;
/// assert_eq!(blob.get(1)?, &[0x06, 0x08, 0x00]);
/// # Ok::<(), win32json::Error>(())
/// ```
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a view over a `#Blob` heap
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is empty or does not start with a 0 byte
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// The blob starting at `index`, without its length prefix
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the index or the encoded length leave the heap
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(out_of_bounds_error!());
        }

        let mut parser = Parser::new(&self.data[index..]);
        let len = parser.read_compressed_uint()? as usize;
        let skip = parser.pos();

        let Some(data_start) = index.checked_add(skip) else {
            return Err(out_of_bounds_error!());
        };

        let Some(data_end) = data_start.checked_add(len) else {
            return Err(out_of_bounds_error!());
        };

        if data_end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        Ok(&self.data[data_start..data_end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = {
            let mut data = vec![0xCC; 600];
            /* i - 0   - always 0    */ data[0] = 0x00;
            /* i - 1   - len 10      */ data[1] = 0x0A;
            /* i - 1   - len 10      */ data[2..12].copy_from_slice(&[0x0A; 10]);
            /* i - 12  - len 0       */ data[12] = 0x00;
            /* i - 13  - len 256     */ data[13] = 0x81;
            /* i - 13  - len 256     */ data[14] = 0x00;
            /* i - 13  - len 256     */ data[15..271].copy_from_slice(&[0xBA; 256]);
            /* i - 271 - past end    */ data[271] = 0x8F;
            /* i - 271 - past end    */ data[272] = 0xFF;
            data
        };

        let blob = Blob::from(&data).unwrap();
        assert_eq!(blob.get(1).unwrap(), &[0x0A; 10]);
        assert!(blob.get(12).unwrap().is_empty());
        assert_eq!(blob.get(13).unwrap(), &[0xBA; 256]);
        assert!(blob.get(271).is_err());
        assert!(blob.get(600).is_err());
    }

    #[test]
    fn invalid() {
        assert!(Blob::from(&[]).is_err());
        assert!(Blob::from(&[0x01]).is_err());
    }
}
