//! Free constants.

use serde_json::Value;

use crate::{
    attributes::{decode_attributes, Attribute},
    classify::{records::ConstantRecord, Classifier},
    metadata::{constants::ConstantValue, flags::FieldAttributes, FieldInfo},
    typesystem::NativeType,
    Result,
};

const LITERAL: FieldAttributes = FieldAttributes::PUBLIC
    .union(FieldAttributes::STATIC)
    .union(FieldAttributes::LITERAL)
    .union(FieldAttributes::HAS_DEFAULT);
const STATIC: FieldAttributes = FieldAttributes::PUBLIC.union(FieldAttributes::STATIC);
const STATIC_READONLY: FieldAttributes = STATIC.union(FieldAttributes::INIT_ONLY);

fn float(value: f64) -> Value {
    if value.is_nan() {
        Value::from("NaN")
    } else if value == f64::INFINITY {
        Value::from("Infinity")
    } else if value == f64::NEG_INFINITY {
        Value::from("-Infinity")
    } else {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl Classifier<'_> {
    /// The native type and JSON value of a constant table entry
    pub(super) fn constant_value(constant: &ConstantValue) -> Result<(NativeType, Value)> {
        Ok(match constant {
            ConstantValue::Boolean(value) => (NativeType::Boolean, Value::from(*value)),
            ConstantValue::Char(value) => (NativeType::Char, Value::from(*value)),
            ConstantValue::I1(value) => (NativeType::SByte, Value::from(*value)),
            ConstantValue::U1(value) => (NativeType::Byte, Value::from(*value)),
            ConstantValue::I2(value) => (NativeType::Int16, Value::from(*value)),
            ConstantValue::U2(value) => (NativeType::UInt16, Value::from(*value)),
            ConstantValue::I4(value) => (NativeType::Int32, Value::from(*value)),
            ConstantValue::U4(value) => (NativeType::UInt32, Value::from(*value)),
            ConstantValue::I8(value) => (NativeType::Int64, Value::from(*value)),
            ConstantValue::U8(value) => (NativeType::UInt64, Value::from(*value)),
            ConstantValue::R4(value) => {
                // shortest decimal form, so 0.1f32 stays 0.1
                let widened = if value.is_finite() {
                    value
                        .to_string()
                        .parse::<f64>()
                        .map_err(|error| {
                            invariant_violation!("f32 {} did not round trip: {}", value, error)
                        })?
                } else {
                    f64::from(*value)
                };
                (NativeType::Single, float(widened))
            }
            ConstantValue::R8(value) => (NativeType::Double, float(*value)),
            ConstantValue::String(value) => (NativeType::String, Value::from(value.as_str())),
            ConstantValue::Null => return Err(data_violation!("null constant")),
        })
    }

    /// Classify a field of an `Apis` type
    pub(super) fn constant(&self, field: &FieldInfo) -> Result<ConstantRecord> {
        let name = field.name.as_str();
        ensure_data!(
            field.offset.is_none() && !field.has_rva,
            "constant '{}' has an offset or an RVA",
            name
        );

        let ty = self.field_type(field)?;
        let mut attrs = Vec::new();
        let mut value = None;
        for attribute in decode_attributes(self.oracle, &field.attributes)? {
            match &attribute {
                Attribute::Guid(guid) => {
                    ensure_data!(value.is_none(), "constant '{}' has more than one value", name);
                    value = Some(("String", Value::from(guid.to_string())));
                }
                Attribute::PropertyKey(key) => {
                    ensure_data!(value.is_none(), "constant '{}' has more than one value", name);
                    value = Some(("PropertyKey", ConstantRecord::property_key_value(key)));
                }
                Attribute::Obsolete(_) | Attribute::Const | Attribute::NativeTypeInfo { .. } => {
                    if let Some(attr) = Self::member_attr(&attribute) {
                        attrs.push(attr);
                    }
                }
                other => {
                    return Err(data_violation!(
                        "attribute {:?} is not valid on constant '{}'",
                        other,
                        name
                    ))
                }
            }
        }

        let (value_type, value) = if field.flags == LITERAL {
            ensure_data!(
                value.is_none(),
                "literal constant '{}' also carries a Guid or PropertyKey",
                name
            );
            let Some(constant) = &field.constant else {
                return Err(data_violation!("literal constant '{}' has no value", name));
            };
            let (native, value) = Self::constant_value(constant)?;
            (native.name(), value)
        } else {
            ensure_data!(
                field.flags == STATIC || field.flags == STATIC_READONLY,
                "constant '{}' has flags {:?}",
                name,
                field.flags
            );
            ensure_data!(
                field.constant.is_none(),
                "constant '{}' has a value but is not a literal",
                name
            );
            let Some(value) = value else {
                return Err(data_violation!(
                    "constant '{}' has neither a value nor a Guid or PropertyKey",
                    name
                ));
            };
            value
        };

        Ok(ConstantRecord {
            name: field.name.clone(),
            ty,
            value_type,
            value,
            attrs,
        })
    }
}
