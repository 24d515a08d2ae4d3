use crate::{
    file::parser::Parser,
    metadata::{
        signatures::{
            ArrayDimensions, SignatureArray, SignatureField, SignatureMethod, SignatureParameter,
            SignaturePointer, SignatureSzArray, SignatureTypeSpec, TypeSignature, ELEMENT_TYPE,
        },
        token::Token,
    },
    Result,
};

/// Nesting limit for recursive types, a winmd never comes close
const MAX_RECURSION_DEPTH: usize = 50;

/// Decoder for signature blobs
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a parser over a signature blob
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
        }
    }

    fn parse_type(&mut self) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(malformed_error!(
                "Signature nesting exceeds {} levels",
                MAX_RECURSION_DEPTH
            ));
        }

        let current_byte = self.parser.read_le::<u8>()?;
        let result = match current_byte {
            ELEMENT_TYPE::VOID => TypeSignature::Void,
            ELEMENT_TYPE::BOOLEAN => TypeSignature::Boolean,
            ELEMENT_TYPE::CHAR => TypeSignature::Char,
            ELEMENT_TYPE::I1 => TypeSignature::I1,
            ELEMENT_TYPE::U1 => TypeSignature::U1,
            ELEMENT_TYPE::I2 => TypeSignature::I2,
            ELEMENT_TYPE::U2 => TypeSignature::U2,
            ELEMENT_TYPE::I4 => TypeSignature::I4,
            ELEMENT_TYPE::U4 => TypeSignature::U4,
            ELEMENT_TYPE::I8 => TypeSignature::I8,
            ELEMENT_TYPE::U8 => TypeSignature::U8,
            ELEMENT_TYPE::R4 => TypeSignature::R4,
            ELEMENT_TYPE::R8 => TypeSignature::R8,
            ELEMENT_TYPE::STRING => TypeSignature::String,
            ELEMENT_TYPE::PTR => TypeSignature::Ptr(SignaturePointer {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            }),
            ELEMENT_TYPE::BYREF => TypeSignature::ByRef(Box::new(self.parse_type()?)),
            ELEMENT_TYPE::VALUETYPE => {
                TypeSignature::ValueType(self.parser.read_compressed_token()?)
            }
            ELEMENT_TYPE::CLASS => TypeSignature::Class(self.parser.read_compressed_token()?),
            ELEMENT_TYPE::VAR => {
                TypeSignature::GenericParamType(self.parser.read_compressed_uint()?)
            }
            ELEMENT_TYPE::ARRAY => {
                let elem_type = self.parse_type()?;
                let rank = self.parser.read_compressed_uint()?;

                let num_sizes = self.parser.read_compressed_uint()?;
                if num_sizes > rank {
                    return Err(malformed_error!(
                        "Array with rank {} lists {} sizes",
                        rank,
                        num_sizes
                    ));
                }

                let mut dimensions: Vec<ArrayDimensions> = Vec::with_capacity(num_sizes as usize);
                for _ in 0..num_sizes {
                    dimensions.push(ArrayDimensions {
                        size: Some(self.parser.read_compressed_uint()?),
                        lower_bound: None,
                    });
                }

                let num_lo_bounds = self.parser.read_compressed_uint()?;
                for i in 0..num_lo_bounds {
                    let lower_bound = self.parser.read_compressed_uint()?;
                    match dimensions.get_mut(i as usize) {
                        Some(dimension) => dimension.lower_bound = Some(lower_bound),
                        None => dimensions.push(ArrayDimensions {
                            size: None,
                            lower_bound: Some(lower_bound),
                        }),
                    }
                }

                TypeSignature::Array(SignatureArray {
                    base: Box::new(elem_type),
                    rank,
                    dimensions,
                })
            }
            ELEMENT_TYPE::GENERICINST => {
                let peek_byte = self.parser.peek_byte()?;
                if peek_byte != ELEMENT_TYPE::CLASS && peek_byte != ELEMENT_TYPE::VALUETYPE {
                    return Err(malformed_error!(
                        "GENERICINST - Next byte is not TYPE_CLASS or TYPE_VALUE - {}",
                        peek_byte
                    ));
                }

                let base_type = self.parse_type()?;
                let arg_count = self.parser.read_compressed_uint()?;
                let mut type_args = Vec::with_capacity(arg_count.min(64) as usize);
                for _ in 0..arg_count {
                    type_args.push(self.parse_type()?);
                }

                TypeSignature::GenericInst(Box::new(base_type), type_args)
            }
            ELEMENT_TYPE::TYPEDBYREF => TypeSignature::TypedByRef,
            ELEMENT_TYPE::I => TypeSignature::I,
            ELEMENT_TYPE::U => TypeSignature::U,
            ELEMENT_TYPE::FNPTR => TypeSignature::FnPtr(Box::new(self.parse_method_signature()?)),
            ELEMENT_TYPE::OBJECT => TypeSignature::Object,
            ELEMENT_TYPE::SZARRAY => TypeSignature::SzArray(SignatureSzArray {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            }),
            ELEMENT_TYPE::MVAR => {
                TypeSignature::GenericParamMethod(self.parser.read_compressed_uint()?)
            }
            ELEMENT_TYPE::CMOD_REQD => {
                TypeSignature::ModifiedRequired(vec![self.parser.read_compressed_token()?])
            }
            ELEMENT_TYPE::CMOD_OPT => {
                TypeSignature::ModifiedOptional(vec![self.parser.read_compressed_token()?])
            }
            ELEMENT_TYPE::INTERNAL => TypeSignature::Internal,
            ELEMENT_TYPE::PINNED => TypeSignature::Pinned(Box::new(self.parse_type()?)),
            _ => {
                return Err(malformed_error!(
                    "Unsupported ELEMENT_TYPE - {}",
                    current_byte
                ))
            }
        };

        self.depth -= 1;
        Ok(result)
    }

    fn parse_custom_mods(&mut self) -> Result<Vec<Token>> {
        let mut mods = Vec::new();
        while self.parser.has_more_data() {
            let next_byte = self.parser.peek_byte()?;
            if next_byte != ELEMENT_TYPE::CMOD_OPT && next_byte != ELEMENT_TYPE::CMOD_REQD {
                break;
            }

            self.parser.advance()?;
            mods.push(self.parser.read_compressed_token()?);
        }

        Ok(mods)
    }

    fn parse_param(&mut self) -> Result<SignatureParameter> {
        let custom_mods = self.parse_custom_mods()?;

        let mut by_ref = false;
        if self.parser.peek_byte()? == ELEMENT_TYPE::BYREF {
            self.parser.advance()?;
            by_ref = true;
        }

        Ok(SignatureParameter {
            modifiers: custom_mods,
            by_ref,
            base: self.parse_type()?,
        })
    }

    /// Parse a method signature (`MethodDefSig`, `MethodRefSig`, `StandAloneMethodSig`)
    ///
    /// # Errors
    /// Returns an error if the blob is truncated or malformed
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        let convention_byte = self.parser.read_le::<u8>()?;
        let convention = convention_byte & 0x0F;
        if convention > 0x05 {
            return Err(malformed_error!(
                "Invalid method calling convention - {}",
                convention_byte
            ));
        }

        let mut method = SignatureMethod {
            has_this: convention_byte & 0x20 != 0,
            explicit_this: convention_byte & 0x40 != 0,
            default: convention == 0x00,
            cdecl: convention == 0x01,
            stdcall: convention == 0x02,
            thiscall: convention == 0x03,
            fastcall: convention == 0x04,
            vararg: convention == 0x05,
            param_count_generic: if convention_byte & 0x10 != 0 {
                self.parser.read_compressed_uint()?
            } else {
                0
            },
            param_count: self.parser.read_compressed_uint()?,
            return_type: self.parse_param()?,
            params: Vec::new(),
            varargs: Vec::new(),
        };

        for _ in 0..method.param_count {
            if self.parser.peek_byte()? == ELEMENT_TYPE::SENTINEL {
                self.parser.advance()?;
                break;
            }

            method.params.push(self.parse_param()?);
        }

        if method.vararg && method.params.len() < method.param_count as usize {
            for _ in method.params.len()..method.param_count as usize {
                method.varargs.push(self.parse_param()?);
            }
        }

        Ok(method)
    }

    /// Parse a field signature
    ///
    /// # Errors
    /// Returns an error if the blob does not start with `FIELD` (0x06) or is malformed
    pub fn parse_field_signature(&mut self) -> Result<SignatureField> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != 0x06 {
            return Err(malformed_error!(
                "SignatureField - invalid start - {}",
                head_byte
            ));
        }

        let custom_mods = self.parse_custom_mods()?;
        let type_sig = self.parse_type()?;

        Ok(SignatureField {
            modifiers: custom_mods,
            base: type_sig,
        })
    }

    /// Parse a `TypeSpec` signature
    ///
    /// # Errors
    /// Returns an error if the blob is truncated or malformed
    pub fn parse_type_spec_signature(&mut self) -> Result<SignatureTypeSpec> {
        let type_sig = self.parse_type()?;
        Ok(SignatureTypeSpec { base: type_sig })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_types() {
        let test_cases = [
            (vec![0x01], TypeSignature::Void),
            (vec![0x02], TypeSignature::Boolean),
            (vec![0x03], TypeSignature::Char),
            (vec![0x04], TypeSignature::I1),
            (vec![0x05], TypeSignature::U1),
            (vec![0x06], TypeSignature::I2),
            (vec![0x07], TypeSignature::U2),
            (vec![0x08], TypeSignature::I4),
            (vec![0x09], TypeSignature::U4),
            (vec![0x0A], TypeSignature::I8),
            (vec![0x0B], TypeSignature::U8),
            (vec![0x0C], TypeSignature::R4),
            (vec![0x0D], TypeSignature::R8),
            (vec![0x0E], TypeSignature::String),
            (vec![0x1C], TypeSignature::Object),
            (vec![0x18], TypeSignature::I),
            (vec![0x19], TypeSignature::U),
        ];

        for (input, expected) in test_cases {
            let mut parser = SignatureParser::new(&input);
            assert_eq!(parser.parse_type().unwrap(), expected);
        }
    }

    #[test]
    fn pointer_and_value_types() {
        // PTR PTR VALUETYPE TypeRef 0x12
        let mut parser = SignatureParser::new(&[0x0F, 0x0F, 0x11, 0x49]);
        let parsed = parser.parse_type().unwrap();

        let TypeSignature::Ptr(outer) = parsed else {
            panic!("expected pointer, got {parsed:?}");
        };
        let TypeSignature::Ptr(inner) = *outer.base else {
            panic!("expected pointer");
        };
        assert_eq!(*inner.base, TypeSignature::ValueType(Token::new(0x0100_0012)));
    }

    #[test]
    fn fixed_array() {
        // ARRAY U2 rank 1, 1 size 128, 1 lower bound 0
        let mut parser = SignatureParser::new(&[0x14, 0x07, 0x01, 0x01, 0x80, 0x80, 0x01, 0x00]);
        let TypeSignature::Array(array) = parser.parse_type().unwrap() else {
            panic!("expected array");
        };

        assert_eq!(*array.base, TypeSignature::U2);
        assert_eq!(array.rank, 1);
        assert_eq!(
            array.dimensions,
            vec![ArrayDimensions {
                size: Some(128),
                lower_bound: Some(0)
            }]
        );
    }

    #[test]
    fn method_signatures() {
        // HASTHIS, 1 param, returns I4, param PTR VOID
        let method = SignatureParser::new(&[0x20, 0x01, 0x08, 0x0F, 0x01])
            .parse_method_signature()
            .unwrap();
        assert!(method.has_this);
        assert!(method.default);
        assert_eq!(method.return_type.base, TypeSignature::I4);
        assert_eq!(method.params.len(), 1);

        // stdcall, no params
        let method = SignatureParser::new(&[0x02, 0x00, 0x01])
            .parse_method_signature()
            .unwrap();
        assert!(method.stdcall);
        assert!(!method.default);
        assert!(!method.vararg);

        // by-ref parameter
        let method = SignatureParser::new(&[0x00, 0x01, 0x01, 0x10, 0x08])
            .parse_method_signature()
            .unwrap();
        assert!(method.params[0].by_ref);

        assert!(SignatureParser::new(&[0x00, 0x02, 0x01, 0x08])
            .parse_method_signature()
            .is_err());
    }

    #[test]
    fn field_signatures() {
        let field = SignatureParser::new(&[0x06, 0x11, 0x08])
            .parse_field_signature()
            .unwrap();
        assert_eq!(field.base, TypeSignature::ValueType(Token::new(0x0200_0002)));

        let field = SignatureParser::new(&[0x06, 0x1F, 0x49, 0x09])
            .parse_field_signature()
            .unwrap();
        assert_eq!(field.modifiers, vec![Token::new(0x0100_0012)]);
        assert_eq!(field.base, TypeSignature::U4);

        assert!(SignatureParser::new(&[0x07, 0x08]).parse_field_signature().is_err());
    }

    #[test]
    fn recursion_limit() {
        let data = vec![0x0F; 100];
        assert!(SignatureParser::new(&data).parse_type().is_err());
    }
}
