//! Writes custom attribute blobs, used to build metadata in memory.

use crate::metadata::{
    customattributes::{AttrValue, FieldOrPropType},
    signatures::ELEMENT_TYPE,
};

/// A named argument to encode
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgSpec {
    /// Field or property name
    pub name: String,
    /// `true` for a field
    pub is_field: bool,
    /// Type tag to write
    pub ty: FieldOrPropType,
    /// Value
    pub value: AttrValue,
}

#[allow(clippy::cast_possible_truncation)]
fn write_compressed_uint(out: &mut Vec<u8>, value: u32) {
    if value < 0x80 {
        out.push(value as u8);
    } else if value < 0x4000 {
        out.push(((value >> 8) as u8) | 0x80);
        out.push(value as u8);
    } else {
        out.push(((value >> 24) as u8) | 0xC0);
        out.push((value >> 16) as u8);
        out.push((value >> 8) as u8);
        out.push(value as u8);
    }
}

fn write_ser_string(out: &mut Vec<u8>, value: Option<&str>) {
    match value {
        Some(value) => {
            #[allow(clippy::cast_possible_truncation)]
            write_compressed_uint(out, value.len() as u32);
            out.extend_from_slice(value.as_bytes());
        }
        None => out.push(0xFF),
    }
}

fn write_value(out: &mut Vec<u8>, value: &AttrValue) {
    match value {
        AttrValue::Bool(value) => out.push(u8::from(*value)),
        AttrValue::U8(value) => out.push(*value),
        AttrValue::I16(value) => out.extend_from_slice(&value.to_le_bytes()),
        AttrValue::U16(value) => out.extend_from_slice(&value.to_le_bytes()),
        AttrValue::I32(value) => out.extend_from_slice(&value.to_le_bytes()),
        AttrValue::U32(value) => out.extend_from_slice(&value.to_le_bytes()),
        AttrValue::I64(value) => out.extend_from_slice(&value.to_le_bytes()),
        AttrValue::Str(value) | AttrValue::Type(value) => write_ser_string(out, value.as_deref()),
    }
}

/// Encode an attribute blob from fixed argument values and named arguments
#[must_use]
pub fn encode_custom_attribute(fixed: &[AttrValue], named: &[NamedArgSpec]) -> Vec<u8> {
    let mut out = vec![0x01, 0x00];

    for value in fixed {
        write_value(&mut out, value);
    }

    #[allow(clippy::cast_possible_truncation)]
    out.extend_from_slice(&(named.len() as u16).to_le_bytes());
    for arg in named {
        out.push(if arg.is_field {
            ELEMENT_TYPE::FIELD
        } else {
            ELEMENT_TYPE::PROPERTY
        });

        match &arg.ty {
            FieldOrPropType::Primitive(element_type) => out.push(*element_type),
            FieldOrPropType::SystemType => out.push(ELEMENT_TYPE::SYSTEM_TYPE),
            FieldOrPropType::Enum(name) => {
                out.push(ELEMENT_TYPE::ENUM);
                write_ser_string(&mut out, Some(name));
            }
        }

        write_ser_string(&mut out, Some(&arg.name));
        write_value(&mut out, &arg.value);
    }

    out
}
