use serde::Serialize;
use strum::IntoStaticStr;

/// A built-in type with a fixed native representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr)]
#[allow(missing_docs)]
pub enum NativeType {
    Void,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    String,
    IntPtr,
    UIntPtr,
    Guid,
}

impl NativeType {
    /// The name used in generated documents
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// `true` for the integer types an enum may be based on
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            NativeType::SByte
                | NativeType::Byte
                | NativeType::Int16
                | NativeType::UInt16
                | NativeType::Int32
                | NativeType::UInt32
                | NativeType::Int64
                | NativeType::UInt64
        )
    }
}

/// How a referenced type is used by its referrers, derived from its base type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetKind {
    /// A value type
    Default,
    /// A delegate, referenced as a function pointer
    FunctionPointer,
    /// An interface, referenced through a pointer
    Com,
}

/// Size of a fixed-length array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ArrayShape {
    /// Number of elements
    #[serde(rename = "Size")]
    pub size: u32,
}

/// A resolved reference to a type, as it appears in field, parameter and return positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "Kind")]
pub enum TypeRef {
    /// A built-in type
    Native {
        /// The built-in type
        #[serde(rename = "Name")]
        name: NativeType,
    },
    /// A type defined in one of the generated API groups
    ApiRef {
        /// Simple name
        #[serde(rename = "Name")]
        name: String,
        /// How the target is used
        #[serde(rename = "TargetKind")]
        target_kind: TargetKind,
        /// API group of the target
        #[serde(rename = "Api")]
        api: String,
        /// Enclosing type names, outermost first
        #[serde(rename = "Parents")]
        parents: Vec<String>,
    },
    /// An unmanaged pointer
    PointerTo {
        /// Pointee
        #[serde(rename = "Child")]
        child: Box<TypeRef>,
    },
    /// A fixed-length array
    Array {
        /// Length, omitted when the metadata declares a single element
        #[serde(rename = "Shape")]
        shape: Option<ArrayShape>,
        /// Element type
        #[serde(rename = "Child")]
        child: Box<TypeRef>,
    },
    /// A type defined in metadata that is not part of the input
    MissingClrType {
        /// Simple name
        #[serde(rename = "Name")]
        name: String,
        /// Namespace
        #[serde(rename = "Namespace")]
        namespace: String,
    },
}

impl TypeRef {
    /// A built-in type
    #[must_use]
    pub fn native(name: NativeType) -> Self {
        TypeRef::Native { name }
    }

    /// A pointer to `child`
    #[must_use]
    pub fn pointer_to(child: TypeRef) -> Self {
        TypeRef::PointerTo {
            child: Box::new(child),
        }
    }

    /// The built-in type, if this is one
    #[must_use]
    pub fn as_native(&self) -> Option<NativeType> {
        match self {
            TypeRef::Native { name } => Some(*name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let pointer = TypeRef::pointer_to(TypeRef::ApiRef {
            name: "_Anonymous_e__Union".to_string(),
            target_kind: TargetKind::Default,
            api: "Foundation".to_string(),
            parents: vec!["OUTER".to_string()],
        });
        assert_eq!(
            serde_json::to_string(&pointer).unwrap(),
            concat!(
                r#"{"Kind":"PointerTo","Child":{"Kind":"ApiRef","Name":"_Anonymous_e__Union","#,
                r#""TargetKind":"Default","Api":"Foundation","Parents":["OUTER"]}}"#
            )
        );

        let array = TypeRef::Array {
            shape: Some(ArrayShape { size: 4 }),
            child: Box::new(TypeRef::native(NativeType::UInt16)),
        };
        assert_eq!(
            serde_json::to_string(&array).unwrap(),
            r#"{"Kind":"Array","Shape":{"Size":4},"Child":{"Kind":"Native","Name":"UInt16"}}"#
        );
    }

    #[test]
    fn native_names() {
        assert_eq!(NativeType::UIntPtr.name(), "UIntPtr");
        assert!(NativeType::Byte.is_integer());
        assert!(!NativeType::Double.is_integer());
        assert_eq!(TypeRef::native(NativeType::Guid).as_native(), Some(NativeType::Guid));
    }
}
