//! Values of the `Constant` table.
//!
//! The blob holds the raw little-endian bytes of the value, its type comes from the row's
//! element type byte. Strings are UTF-16 without terminator, a null reference is stored as
//! `ELEMENT_TYPE_CLASS` with four zero bytes.

use widestring::U16Str;

use crate::{file::io::read_le, metadata::signatures::ELEMENT_TYPE, Result};

/// A decoded constant
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// `bool`
    Boolean(bool),
    /// `char`, a UTF-16 code unit
    Char(u16),
    /// `int8`
    I1(i8),
    /// `uint8`
    U1(u8),
    /// `int16`
    I2(i16),
    /// `uint16`
    U2(u16),
    /// `int32`
    I4(i32),
    /// `uint32`
    U4(u32),
    /// `int64`
    I8(i64),
    /// `uint64`
    U8(u64),
    /// `float32`
    R4(f32),
    /// `float64`
    R8(f64),
    /// `string`
    String(String),
    /// Null reference
    Null,
}

impl ConstantValue {
    /// Decode a constant of element type `base` from `blob`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for an unknown element type, a blob of the wrong size,
    /// or a string that is not valid UTF-16
    pub fn decode(base: u8, blob: &[u8]) -> Result<ConstantValue> {
        let expected_len = match base {
            ELEMENT_TYPE::BOOLEAN | ELEMENT_TYPE::I1 | ELEMENT_TYPE::U1 => Some(1),
            ELEMENT_TYPE::CHAR | ELEMENT_TYPE::I2 | ELEMENT_TYPE::U2 => Some(2),
            ELEMENT_TYPE::I4 | ELEMENT_TYPE::U4 | ELEMENT_TYPE::R4 | ELEMENT_TYPE::CLASS => Some(4),
            ELEMENT_TYPE::I8 | ELEMENT_TYPE::U8 | ELEMENT_TYPE::R8 => Some(8),
            ELEMENT_TYPE::STRING => None,
            _ => {
                return Err(malformed_error!(
                    "Invalid constant element type - 0x{:02X}",
                    base
                ))
            }
        };

        if let Some(expected_len) = expected_len {
            if blob.len() != expected_len {
                return Err(malformed_error!(
                    "Constant of type 0x{:02X} has {} bytes, expected {}",
                    base,
                    blob.len(),
                    expected_len
                ));
            }
        }

        Ok(match base {
            ELEMENT_TYPE::BOOLEAN => ConstantValue::Boolean(blob[0] != 0),
            ELEMENT_TYPE::CHAR => ConstantValue::Char(read_le::<u16>(blob)?),
            ELEMENT_TYPE::I1 => ConstantValue::I1(read_le::<i8>(blob)?),
            ELEMENT_TYPE::U1 => ConstantValue::U1(blob[0]),
            ELEMENT_TYPE::I2 => ConstantValue::I2(read_le::<i16>(blob)?),
            ELEMENT_TYPE::U2 => ConstantValue::U2(read_le::<u16>(blob)?),
            ELEMENT_TYPE::I4 => ConstantValue::I4(read_le::<i32>(blob)?),
            ELEMENT_TYPE::U4 => ConstantValue::U4(read_le::<u32>(blob)?),
            ELEMENT_TYPE::I8 => ConstantValue::I8(read_le::<i64>(blob)?),
            ELEMENT_TYPE::U8 => ConstantValue::U8(read_le::<u64>(blob)?),
            ELEMENT_TYPE::R4 => ConstantValue::R4(read_le::<f32>(blob)?),
            ELEMENT_TYPE::R8 => ConstantValue::R8(read_le::<f64>(blob)?),
            ELEMENT_TYPE::CLASS => {
                if read_le::<u32>(blob)? != 0 {
                    return Err(malformed_error!("Class constant is not a null reference"));
                }
                ConstantValue::Null
            }
            _ => {
                if blob.len() % 2 != 0 {
                    return Err(malformed_error!(
                        "String constant has odd length {}",
                        blob.len()
                    ));
                }

                let units = blob
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect::<Vec<u16>>();
                match U16Str::from_slice(&units).to_string() {
                    Ok(value) => ConstantValue::String(value),
                    Err(_) => return Err(malformed_error!("String constant is not valid UTF-16")),
                }
            }
        })
    }

    /// The element type this value is stored as
    #[must_use]
    pub fn element_type(&self) -> u8 {
        match self {
            ConstantValue::Boolean(_) => ELEMENT_TYPE::BOOLEAN,
            ConstantValue::Char(_) => ELEMENT_TYPE::CHAR,
            ConstantValue::I1(_) => ELEMENT_TYPE::I1,
            ConstantValue::U1(_) => ELEMENT_TYPE::U1,
            ConstantValue::I2(_) => ELEMENT_TYPE::I2,
            ConstantValue::U2(_) => ELEMENT_TYPE::U2,
            ConstantValue::I4(_) => ELEMENT_TYPE::I4,
            ConstantValue::U4(_) => ELEMENT_TYPE::U4,
            ConstantValue::I8(_) => ELEMENT_TYPE::I8,
            ConstantValue::U8(_) => ELEMENT_TYPE::U8,
            ConstantValue::R4(_) => ELEMENT_TYPE::R4,
            ConstantValue::R8(_) => ELEMENT_TYPE::R8,
            ConstantValue::String(_) => ELEMENT_TYPE::STRING,
            ConstantValue::Null => ELEMENT_TYPE::CLASS,
        }
    }

    /// The raw blob of this value, the inverse of [`ConstantValue::decode`]
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ConstantValue::Boolean(value) => vec![u8::from(*value)],
            ConstantValue::Char(value) | ConstantValue::U2(value) => value.to_le_bytes().to_vec(),
            ConstantValue::I1(value) => value.to_le_bytes().to_vec(),
            ConstantValue::U1(value) => vec![*value],
            ConstantValue::I2(value) => value.to_le_bytes().to_vec(),
            ConstantValue::I4(value) => value.to_le_bytes().to_vec(),
            ConstantValue::U4(value) => value.to_le_bytes().to_vec(),
            ConstantValue::I8(value) => value.to_le_bytes().to_vec(),
            ConstantValue::U8(value) => value.to_le_bytes().to_vec(),
            ConstantValue::R4(value) => value.to_le_bytes().to_vec(),
            ConstantValue::R8(value) => value.to_le_bytes().to_vec(),
            ConstantValue::String(value) => value
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect(),
            ConstantValue::Null => vec![0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(
            ConstantValue::decode(ELEMENT_TYPE::I4, &[0x57, 0x00, 0x07, 0x80]).unwrap(),
            ConstantValue::I4(-2_147_024_809)
        );
        assert_eq!(
            ConstantValue::decode(ELEMENT_TYPE::U2, &[0xFF, 0xFF]).unwrap(),
            ConstantValue::U2(0xFFFF)
        );
        assert_eq!(
            ConstantValue::decode(ELEMENT_TYPE::BOOLEAN, &[0x01]).unwrap(),
            ConstantValue::Boolean(true)
        );
        assert!(ConstantValue::decode(ELEMENT_TYPE::I4, &[0x00, 0x00]).is_err());
    }

    #[test]
    fn floats() {
        let infinity = ConstantValue::decode(ELEMENT_TYPE::R4, &[0x00, 0x00, 0x80, 0x7F]).unwrap();
        assert_eq!(infinity, ConstantValue::R4(f32::INFINITY));

        let value = ConstantValue::decode(ELEMENT_TYPE::R8, &1.5_f64.to_le_bytes()).unwrap();
        assert_eq!(value, ConstantValue::R8(1.5));
    }

    #[test]
    fn strings() {
        let value = ConstantValue::decode(ELEMENT_TYPE::STRING, &[0x41, 0x00, 0x42, 0x00]).unwrap();
        assert_eq!(value, ConstantValue::String("AB".to_string()));

        let empty = ConstantValue::decode(ELEMENT_TYPE::STRING, &[]).unwrap();
        assert_eq!(empty, ConstantValue::String(String::new()));

        assert!(ConstantValue::decode(ELEMENT_TYPE::STRING, &[0x41]).is_err());
        assert!(ConstantValue::decode(ELEMENT_TYPE::STRING, &[0x00, 0xD8]).is_err());
    }

    #[test]
    fn null_and_invalid() {
        assert_eq!(
            ConstantValue::decode(ELEMENT_TYPE::CLASS, &[0, 0, 0, 0]).unwrap(),
            ConstantValue::Null
        );
        assert!(ConstantValue::decode(ELEMENT_TYPE::CLASS, &[1, 0, 0, 0]).is_err());
        assert!(ConstantValue::decode(ELEMENT_TYPE::OBJECT, &[0, 0, 0, 0]).is_err());
    }

    #[test]
    fn encode_matches_decode() {
        for value in [
            ConstantValue::I8(-5),
            ConstantValue::String("Wide".to_string()),
            ConstantValue::Char(0x41),
            ConstantValue::Null,
        ] {
            let blob = value.encode();
            assert_eq!(ConstantValue::decode(value.element_type(), &blob).unwrap(), value);
        }
    }
}
