//! Win32 shaped metadata built through the public [`MetadataBuilder`] API.
#![allow(dead_code)]

use win32json::{
    attributes::METADATA_NAMESPACE,
    metadata::{
        builder::MetadataBuilder,
        constants::ConstantValue,
        customattributes::{AttrValue, CtorParamType},
        flags::{
            FieldAttributes, MethodAttributes, MethodImplAttributes, PInvokeAttributes,
            ParamAttributes, TypeAttributes,
        },
        signatures::{SignatureMethod, SignatureParameter, TypeSignature, ELEMENT_TYPE},
        token::Token,
        ImportInfo, ResolutionScope,
    },
    Result,
};

pub const STRUCT: TypeAttributes = TypeAttributes::PUBLIC
    .union(TypeAttributes::SEQUENTIAL_LAYOUT)
    .union(TypeAttributes::SEALED);

pub fn signature(return_type: TypeSignature, params: Vec<TypeSignature>) -> SignatureMethod {
    SignatureMethod {
        default: true,
        param_count: params.len() as u32,
        return_type: SignatureParameter {
            base: return_type,
            ..SignatureParameter::default()
        },
        params: params
            .into_iter()
            .map(|base| SignatureParameter {
                base,
                ..SignatureParameter::default()
            })
            .collect(),
        ..SignatureMethod::default()
    }
}

/// Definitions the way win32metadata emits them.
pub struct Win32Metadata {
    pub builder: MetadataBuilder,
    value_type: Token,
    enum_base: Token,
    guid: Token,
}

impl Win32Metadata {
    pub fn new() -> Self {
        let mut builder = MetadataBuilder::new();
        let netstandard = || ResolutionScope::AssemblyRef("netstandard".to_string());
        let value_type = builder.add_type_ref("System", "ValueType", netstandard());
        let enum_base = builder.add_type_ref("System", "Enum", netstandard());
        let guid = builder.add_type_ref("System", "Guid", netstandard());
        builder.add_type_def("", "<Module>", TypeAttributes::empty(), None);
        Win32Metadata {
            builder,
            value_type,
            enum_base,
            guid,
        }
    }

    fn namespace(api: &str) -> String {
        format!("Windows.Win32.{api}")
    }

    pub fn apis(&mut self, api: &str) -> Token {
        self.builder.add_type_def(
            &Self::namespace(api),
            "Apis",
            TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT | TypeAttributes::SEALED,
            None,
        )
    }

    pub fn structure(&mut self, api: &str, name: &str, fields: &[(&str, TypeSignature)]) -> Token {
        let ty = self
            .builder
            .add_type_def(&Self::namespace(api), name, STRUCT, Some(self.value_type));
        for (field, signature) in fields {
            self.builder
                .add_field(ty, field, FieldAttributes::PUBLIC, signature.clone());
        }
        ty
    }

    pub fn typedef(&mut self, api: &str, name: &str, def: TypeSignature) -> Result<Token> {
        let ty = self.structure(api, name, &[("Value", def)]);
        self.marker(ty, "NativeTypedefAttribute")?;
        Ok(ty)
    }

    pub fn enumeration(&mut self, api: &str, name: &str, values: &[(&str, i32)]) -> Result<Token> {
        let ty = self.builder.add_type_def(
            &Self::namespace(api),
            name,
            TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            Some(self.enum_base),
        );
        self.builder.add_field(
            ty,
            "value__",
            FieldAttributes::PUBLIC
                | FieldAttributes::SPECIAL_NAME
                | FieldAttributes::RT_SPECIAL_NAME,
            TypeSignature::I4,
        );
        for (value_name, value) in values {
            let field = self.builder.add_field(
                ty,
                value_name,
                FieldAttributes::PUBLIC
                    | FieldAttributes::STATIC
                    | FieldAttributes::LITERAL
                    | FieldAttributes::HAS_DEFAULT,
                TypeSignature::ValueType(ty),
            );
            self.builder.set_constant(field, ConstantValue::I4(*value))?;
        }
        Ok(ty)
    }

    pub fn interface(&mut self, api: &str, name: &str, guid: Option<&str>) -> Result<Token> {
        let ty = self.builder.add_type_def(
            &Self::namespace(api),
            name,
            TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
            None,
        );
        if let Some(guid) = guid {
            self.builder.add_attribute(
                ty,
                "System.Runtime.InteropServices",
                "GuidAttribute",
                vec![CtorParamType::Primitive(ELEMENT_TYPE::STRING)],
                &[AttrValue::Str(Some(guid.to_string()))],
                &[],
            )?;
        }
        Ok(ty)
    }

    pub fn com_method(
        &mut self,
        interface: Token,
        name: &str,
        return_type: TypeSignature,
        params: &[(&str, TypeSignature, ParamAttributes)],
    ) -> Result<Token> {
        let method = self.builder.add_method(
            interface,
            name,
            MethodAttributes::PUBLIC
                | MethodAttributes::VIRTUAL
                | MethodAttributes::HIDE_BY_SIG
                | MethodAttributes::NEW_SLOT
                | MethodAttributes::ABSTRACT,
            MethodImplAttributes::empty(),
            SignatureMethod {
                has_this: true,
                ..signature(return_type, params.iter().map(|(_, ty, _)| ty.clone()).collect())
            },
        );
        self.params(method, params)?;
        Ok(method)
    }

    pub fn literal(
        &mut self,
        apis: Token,
        name: &str,
        ty: TypeSignature,
        value: ConstantValue,
    ) -> Result<Token> {
        let field = self.builder.add_field(
            apis,
            name,
            FieldAttributes::PUBLIC
                | FieldAttributes::STATIC
                | FieldAttributes::LITERAL
                | FieldAttributes::HAS_DEFAULT,
            ty,
        );
        self.builder.set_constant(field, value)?;
        Ok(field)
    }

    pub fn guid_constant(&mut self, apis: Token, name: &str, guid: &str) -> Result<Token> {
        let field = self.builder.add_field(
            apis,
            name,
            FieldAttributes::PUBLIC | FieldAttributes::STATIC,
            TypeSignature::ValueType(self.guid),
        );
        self.builder.add_attribute(
            field,
            "System.Runtime.InteropServices",
            "GuidAttribute",
            vec![CtorParamType::Primitive(ELEMENT_TYPE::STRING)],
            &[AttrValue::Str(Some(guid.to_string()))],
            &[],
        )?;
        Ok(field)
    }

    pub fn function(
        &mut self,
        apis: Token,
        name: &str,
        module: &str,
        return_type: TypeSignature,
        params: &[(&str, TypeSignature, ParamAttributes)],
    ) -> Result<Token> {
        let function = self.builder.add_method(
            apis,
            name,
            MethodAttributes::PUBLIC
                | MethodAttributes::STATIC
                | MethodAttributes::PINVOKE_IMPL
                | MethodAttributes::HIDE_BY_SIG,
            MethodImplAttributes::PRESERVE_SIG,
            signature(return_type, params.iter().map(|(_, ty, _)| ty.clone()).collect()),
        );
        self.builder.set_import(
            function,
            ImportInfo {
                flags: PInvokeAttributes::NO_MANGLE | PInvokeAttributes::CALL_CONV_WINAPI,
                name: name.to_string(),
                module: module.to_string(),
            },
        )?;
        self.params(function, params)?;
        Ok(function)
    }

    fn params(
        &mut self,
        method: Token,
        params: &[(&str, TypeSignature, ParamAttributes)],
    ) -> Result<()> {
        for (index, (name, _, flags)) in params.iter().enumerate() {
            self.builder.add_param(method, index as u16 + 1, name, *flags)?;
        }
        Ok(())
    }

    pub fn marker(&mut self, parent: Token, name: &str) -> Result<Token> {
        self.builder
            .add_attribute(parent, METADATA_NAMESPACE, name, Vec::new(), &[], &[])
    }

    /// A small but complete module spanning three API groups
    pub fn sample() -> Result<Self> {
        let mut md = Win32Metadata::new();

        let foundation = md.apis("Foundation");
        md.literal(foundation, "MAX_PATH", TypeSignature::U4, ConstantValue::U4(260))?;
        let hwnd = md.typedef("Foundation", "HWND", TypeSignature::I)?;
        let bool_ty = md.typedef("Foundation", "BOOL", TypeSignature::I4)?;
        let point = md.structure(
            "Foundation",
            "POINT",
            &[("x", TypeSignature::I4), ("y", TypeSignature::I4)],
        );

        let usb = md.apis("Devices.Usb");
        md.guid_constant(usb, "WinUSB_TestGuid", "da812bff-12c3-46a2-8e2b-dbd3b7834c43")?;
        md.guid_constant(usb, "WinUSB_TestGuid", "da812bff-12c3-46a2-8e2b-dbd3b7834c43")?;

        let ui = md.apis("UI.WindowsAndMessaging");
        md.enumeration(
            "UI.WindowsAndMessaging",
            "SHOW_WINDOW_CMD",
            &[("SW_HIDE", 0), ("SW_SHOWNORMAL", 1)],
        )?;
        md.structure(
            "UI.WindowsAndMessaging",
            "MSG",
            &[
                ("hwnd", TypeSignature::ValueType(hwnd)),
                ("pt", TypeSignature::ValueType(point)),
            ],
        );
        md.function(
            ui,
            "ShowWindow",
            "USER32.dll",
            TypeSignature::ValueType(bool_ty),
            &[
                ("hWnd", TypeSignature::ValueType(hwnd), ParamAttributes::IN),
                ("nCmdShow", TypeSignature::I4, ParamAttributes::IN),
            ],
        )?;
        for name in ["MessageBoxA", "MessageBoxW"] {
            md.function(
                ui,
                name,
                "USER32.dll",
                TypeSignature::I4,
                &[("hWnd", TypeSignature::ValueType(hwnd), ParamAttributes::IN)],
            )?;
        }

        let unknown = md.interface(
            "System.Com",
            "IUnknown",
            Some("00000000-0000-0000-c000-000000000046"),
        )?;
        md.com_method(unknown, "Release", TypeSignature::U4, &[])?;

        Ok(md)
    }
}
