use std::{ffi::CStr, str};

use crate::Result;

/// The `#Strings` heap, a sequence of NUL terminated UTF-8 identifiers.
///
/// Index 0 is always the empty string.
///
/// ```rust
/// use win32json::metadata::streams::Strings;
///
/// let data = &[0u8, b'A', b'p', b'i', b's', 0u8];
/// let strings = Strings::from(data)?;
/// assert_eq!(strings.get(1)?, "Apis");
/// assert_eq!(strings.get(0)?, "");
/// # Ok::<(), win32json::Error>(())
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a view over a `#Strings` heap
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is empty or does not start with a NUL byte
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Strings heap is empty"));
        }

        Ok(Strings { data })
    }

    /// The string starting at `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for an index past the heap, or
    /// [`crate::Error::Malformed`] for an unterminated or non UTF-8 entry
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(out_of_bounds_error!());
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }
}
