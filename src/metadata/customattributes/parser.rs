use crate::{
    file::parser::Parser,
    metadata::{
        customattributes::{
            AttrArg, AttrArgType, AttrArgTypeProvider, AttrValue, CtorParamType, FieldOrPropType,
            NamedArg,
        },
        signatures::ELEMENT_TYPE,
    },
    Result,
};

/// Decoder for custom attribute blobs (ECMA-335 II.23.3)
pub struct CustomAttributeParser<'a> {
    parser: Parser<'a>,
}

impl<'a> CustomAttributeParser<'a> {
    /// Create a parser over an attribute blob
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        CustomAttributeParser {
            parser: Parser::new(data),
        }
    }

    /// Decode the blob, using `params` for the fixed arguments
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a damaged blob, or the error of `provider` for
    /// argument types it does not accept
    pub fn parse_custom_attribute(
        &mut self,
        params: &[CtorParamType],
        provider: &dyn AttrArgTypeProvider,
    ) -> Result<(Vec<AttrArg>, Vec<NamedArg>)> {
        let prolog = self.parser.read_le::<u16>()?;
        if prolog != 0x0001 {
            return Err(malformed_error!(
                "Invalid custom attribute prolog - expected 0x0001, got 0x{:04X}",
                prolog
            ));
        }

        let mut fixed = Vec::with_capacity(params.len());
        for param in params {
            let ty = param.resolve(provider)?;
            let value = self.parse_value(ty)?;
            fixed.push(AttrArg { ty, value });
        }

        let num_named = self.parser.read_le::<u16>()?;
        let mut named = Vec::with_capacity(num_named as usize);
        for _ in 0..num_named {
            named.push(self.parse_named_argument(provider)?);
        }

        if self.parser.has_more_data() {
            return Err(malformed_error!(
                "{} trailing bytes after custom attribute arguments",
                self.parser.remaining()
            ));
        }

        Ok((fixed, named))
    }

    fn parse_named_argument(&mut self, provider: &dyn AttrArgTypeProvider) -> Result<NamedArg> {
        let is_field = match self.parser.read_le::<u8>()? {
            ELEMENT_TYPE::FIELD => true,
            ELEMENT_TYPE::PROPERTY => false,
            other => {
                return Err(malformed_error!(
                    "Invalid field/property indicator: 0x{:02X}",
                    other
                ))
            }
        };

        let ty = self.parse_field_or_prop_type()?.resolve(provider)?;

        let Some(name) = self.parser.read_ser_string()? else {
            return Err(malformed_error!("Named argument without a name"));
        };

        let value = self.parse_value(ty)?;

        Ok(NamedArg {
            name,
            is_field,
            arg: AttrArg { ty, value },
        })
    }

    fn parse_field_or_prop_type(&mut self) -> Result<FieldOrPropType> {
        let type_tag = self.parser.read_le::<u8>()?;
        match type_tag {
            ELEMENT_TYPE::BOOLEAN..=ELEMENT_TYPE::STRING => {
                Ok(FieldOrPropType::Primitive(type_tag))
            }
            ELEMENT_TYPE::SYSTEM_TYPE => Ok(FieldOrPropType::SystemType),
            ELEMENT_TYPE::ENUM => match self.parser.read_ser_string()? {
                Some(name) => Ok(FieldOrPropType::Enum(name)),
                None => Err(malformed_error!("Enum argument without a type name")),
            },
            ELEMENT_TYPE::BOXED | ELEMENT_TYPE::SZARRAY => Err(data_violation!(
                "unsupported named argument type 0x{:02X}",
                type_tag
            )),
            _ => Err(malformed_error!(
                "Invalid named argument type: 0x{:02X}",
                type_tag
            )),
        }
    }

    fn parse_value(&mut self, ty: AttrArgType) -> Result<AttrValue> {
        Ok(match ty.underlying() {
            AttrArgType::Bool => match self.parser.read_le::<u8>()? {
                0 => AttrValue::Bool(false),
                1 => AttrValue::Bool(true),
                other => {
                    return Err(malformed_error!("Invalid boolean argument - {}", other));
                }
            },
            AttrArgType::Byte => AttrValue::U8(self.parser.read_le::<u8>()?),
            AttrArgType::Int16 => AttrValue::I16(self.parser.read_le::<i16>()?),
            AttrArgType::UInt16 => AttrValue::U16(self.parser.read_le::<u16>()?),
            AttrArgType::Int32 => AttrValue::I32(self.parser.read_le::<i32>()?),
            AttrArgType::UInt32 => AttrValue::U32(self.parser.read_le::<u32>()?),
            AttrArgType::Int64 => AttrValue::I64(self.parser.read_le::<i64>()?),
            AttrArgType::Str => AttrValue::Str(self.parser.read_ser_string()?),
            AttrArgType::SystemType => AttrValue::Type(self.parser.read_ser_string()?),
            other => {
                return Err(invariant_violation!(
                    "{:?} has no storage type",
                    other
                ))
            }
        })
    }
}

/// Decode an attribute blob with the constructor parameter types `params`
///
/// # Errors
/// Returns an error if the blob is damaged or uses argument types `provider` rejects
pub fn parse_custom_attribute_blob(
    data: &[u8],
    params: &[CtorParamType],
    provider: &dyn AttrArgTypeProvider,
) -> Result<(Vec<AttrArg>, Vec<NamedArg>)> {
    let mut parser = CustomAttributeParser::new(data);
    parser.parse_custom_attribute(params, provider)
}
