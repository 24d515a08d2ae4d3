//! Attribute flag sets of the tables a winmd uses (ECMA-335 II.23.1).
//!
//! Flags are kept with all their raw bits (`from_bits_retain`), since the classifier compares
//! complete flag words and an unknown bit has to make such a comparison fail. Multi-bit fields
//! such as visibility or layout are exposed through their mask and accessor methods.

use bitflags::bitflags;

/// Bitmask for the type visibility field
pub const TYPE_VISIBILITY_MASK: u32 = 0x0007;
/// Bitmask for the type layout field
pub const TYPE_LAYOUT_MASK: u32 = 0x0018;
/// Bitmask for member access of fields and methods
pub const MEMBER_ACCESS_MASK: u32 = 0x0007;
/// Bitmask for the code type of method implementation flags
pub const METHOD_IMPL_CODE_TYPE_MASK: u32 = 0x0003;
/// Bitmask for the character set of an `ImplMap` row
pub const PINVOKE_CHAR_SET_MASK: u32 = 0x0006;
/// Bitmask for the best-fit mapping field of an `ImplMap` row
pub const PINVOKE_BEST_FIT_MASK: u32 = 0x0030;
/// Bitmask for the calling convention of an `ImplMap` row
pub const PINVOKE_CALL_CONV_MASK: u32 = 0x0700;
/// Bitmask for the throw-on-unmappable-char field of an `ImplMap` row
pub const PINVOKE_THROW_ON_UNMAPPABLE_MASK: u32 = 0x3000;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// `TypeDef` flags
    pub struct TypeAttributes: u32 {
        /// Top-level type visible outside the assembly
        const PUBLIC = 0x0000_0001;
        /// Nested type with public visibility
        const NESTED_PUBLIC = 0x0000_0002;
        /// Fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Field offsets are given explicitly
        const EXPLICIT_LAYOUT = 0x0000_0010;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Type is abstract
        const ABSTRACT = 0x0000_0080;
        /// Type cannot be derived from
        const SEALED = 0x0000_0100;
        /// Name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Type is imported
        const IMPORT = 0x0000_1000;
        /// Type is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Type is a Windows Runtime type
        const WINDOWS_RUNTIME = 0x0000_4000;
        /// Initialize the type before the first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;

        const _ = !0;
    }
}

impl TypeAttributes {
    /// Raw value of the visibility field
    #[must_use]
    pub fn visibility(self) -> u32 {
        self.bits() & TYPE_VISIBILITY_MASK
    }

    /// Raw value of the layout field
    #[must_use]
    pub fn layout(self) -> u32 {
        self.bits() & TYPE_LAYOUT_MASK
    }

    /// `true` for sequential layout
    #[must_use]
    pub fn is_sequential(self) -> bool {
        self.layout() == Self::SEQUENTIAL_LAYOUT.bits()
    }

    /// `true` for explicit layout
    #[must_use]
    pub fn is_explicit(self) -> bool {
        self.layout() == Self::EXPLICIT_LAYOUT.bits()
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// `Field` flags
    pub struct FieldAttributes: u32 {
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on the type, not per instance
        const STATIC = 0x0010;
        /// Only assigned during initialization
        const INIT_ONLY = 0x0020;
        /// Value is a compile time constant
        const LITERAL = 0x0040;
        /// Not serialized
        const NOT_SERIALIZED = 0x0080;
        /// Field has an RVA
        const HAS_FIELD_RVA = 0x0100;
        /// Name is special
        const SPECIAL_NAME = 0x0200;
        /// Name is special to the runtime
        const RT_SPECIAL_NAME = 0x0400;
        /// Field has marshalling information
        const HAS_FIELD_MARSHAL = 0x1000;
        /// Field is a P/Invoke implementation
        const PINVOKE_IMPL = 0x2000;
        /// Field has a default value
        const HAS_DEFAULT = 0x8000;

        const _ = !0;
    }
}

impl FieldAttributes {
    /// Raw value of the access field
    #[must_use]
    pub fn access(self) -> u32 {
        self.bits() & MEMBER_ACCESS_MASK
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// `MethodDef` flags
    pub struct MethodAttributes: u32 {
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on the type, not per instance
        const STATIC = 0x0010;
        /// Cannot be overridden
        const FINAL = 0x0020;
        /// Virtual method
        const VIRTUAL = 0x0040;
        /// Hidden by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Always gets a new vtable slot
        const NEW_SLOT = 0x0100;
        /// Overridable only when also accessible
        const CHECK_ACCESS_ON_OVERRIDE = 0x0200;
        /// No implementation is provided
        const ABSTRACT = 0x0400;
        /// Name is special
        const SPECIAL_NAME = 0x0800;
        /// Name is special to the runtime
        const RT_SPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through P/Invoke
        const PINVOKE_IMPL = 0x2000;
        /// Method has security associated with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;

        const _ = !0;
    }
}

impl MethodAttributes {
    /// Raw value of the access field
    #[must_use]
    pub fn access(self) -> u32 {
        self.bits() & MEMBER_ACCESS_MASK
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// `MethodDef` implementation flags
    pub struct MethodImplAttributes: u32 {
        /// Implementation is native code
        const NATIVE = 0x0001;
        /// Implementation is provided by the runtime
        const RUNTIME = 0x0003;
        /// Implementation is unmanaged
        const UNMANAGED = 0x0004;
        /// Method cannot be inlined
        const NO_INLINING = 0x0008;
        /// Method is single threaded through the body
        const SYNCHRONIZED = 0x0020;
        /// Signature is exported exactly as declared
        const PRESERVE_SIG = 0x0080;
        /// Implementation is internal to the runtime
        const INTERNAL_CALL = 0x1000;

        const _ = !0;
    }
}

impl MethodImplAttributes {
    /// Raw value of the code type field
    #[must_use]
    pub fn code_type(self) -> u32 {
        self.bits() & METHOD_IMPL_CODE_TYPE_MASK
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// `ImplMap` flags
    pub struct PInvokeAttributes: u32 {
        /// Use the member name as specified
        const NO_MANGLE = 0x0001;
        /// Marshal strings as ANSI
        const CHAR_SET_ANSI = 0x0002;
        /// Marshal strings as UTF-16
        const CHAR_SET_UNICODE = 0x0004;
        /// Best-fit mapping enabled
        const BEST_FIT_ENABLED = 0x0010;
        /// Best-fit mapping disabled
        const BEST_FIT_DISABLED = 0x0020;
        /// Native code sets the last error
        const SUPPORTS_LAST_ERROR = 0x0040;
        /// Platform default calling convention
        const CALL_CONV_WINAPI = 0x0100;
        /// Throw on unmappable characters
        const THROW_ON_UNMAPPABLE_ENABLED = 0x1000;
        /// Do not throw on unmappable characters
        const THROW_ON_UNMAPPABLE_DISABLED = 0x2000;

        const _ = !0;
    }
}

impl PInvokeAttributes {
    /// Raw value of the character set field
    #[must_use]
    pub fn char_set(self) -> u32 {
        self.bits() & PINVOKE_CHAR_SET_MASK
    }

    /// Raw value of the best-fit field
    #[must_use]
    pub fn best_fit(self) -> u32 {
        self.bits() & PINVOKE_BEST_FIT_MASK
    }

    /// Raw value of the calling convention field
    #[must_use]
    pub fn call_conv(self) -> u32 {
        self.bits() & PINVOKE_CALL_CONV_MASK
    }

    /// Raw value of the throw-on-unmappable field
    #[must_use]
    pub fn throw_on_unmappable(self) -> u32 {
        self.bits() & PINVOKE_THROW_ON_UNMAPPABLE_MASK
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// `Param` flags
    pub struct ParamAttributes: u32 {
        /// Input parameter
        const IN = 0x0001;
        /// Output parameter
        const OUT = 0x0002;
        /// Optional parameter
        const OPTIONAL = 0x0010;
        /// Parameter has a default value
        const HAS_DEFAULT = 0x1000;
        /// Parameter has marshalling information
        const HAS_FIELD_MARSHAL = 0x2000;

        const _ = !0;
    }
}
