//! Patch configuration.
//!
//! A [`PatchConfig`] lists corrections per API group. The built-in [`PatchConfig::win32`] table
//! covers known defects of the published `Windows.Win32.winmd`; additional tables can be loaded
//! from JSON:
//!
//! ```json
//! {
//!     "Funcs": [
//!         {
//!             "Api": "UI.WindowsAndMessaging",
//!             "Name": "ShowWindow",
//!             "Params": [{ "Name": "hWnd", "Optional": true }]
//!         }
//!     ],
//!     "Types": [
//!         { "Api": "System.Iis", "Name": "CONFIGURATION_ENTRY", "Remove": true }
//!     ]
//! }
//! ```

use std::path::Path;

use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer,
};
use serde_json::{Map, Value};

use crate::Result;

/// A correction for a free constant
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ConstPatchConfig {
    /// API group
    pub api: String,
    /// Constant name
    pub name: String,
    /// The constant is defined twice, the second definition is dropped
    #[serde(default)]
    pub duplicated: bool,
}

/// A correction for a parameter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ParamPatchConfig {
    /// Parameter name
    pub name: String,
    /// Mark the parameter optional
    #[serde(default)]
    pub optional: bool,
    /// Mark the parameter const
    #[serde(default, rename = "Const")]
    pub is_const: bool,
}

/// A correction for a return type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ReturnTypePatchConfig {
    /// Mark the return value optional
    #[serde(default)]
    pub optional: bool,
}

/// A correction for a function or COM method
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct FuncPatchConfig {
    /// Function name
    pub name: String,
    /// Emit the parameters from the signature alone, ignoring the parameter rows
    #[serde(default)]
    pub skip_params: bool,
    /// Return type correction
    #[serde(default)]
    pub return_type: Option<ReturnTypePatchConfig>,
    /// Parameter corrections
    #[serde(default)]
    pub params: Vec<ParamPatchConfig>,
}

/// A correction for a struct or union field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct FieldPatchConfig {
    /// Field name
    pub name: String,
    /// Mark the field optional
    #[serde(default)]
    pub optional: bool,
}

/// A correction for a type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct TypePatchConfig {
    /// Type name
    pub name: String,
    /// Leave the type out of the output
    #[serde(default)]
    pub remove: bool,
    /// Field corrections
    #[serde(default)]
    pub fields: Vec<FieldPatchConfig>,
    /// Corrections for nested types
    #[serde(default)]
    pub nested_types: Vec<TypePatchConfig>,
}

/// A correction for a COM interface
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ComTypePatchConfig {
    /// Interface name
    pub name: String,
    /// Method corrections
    #[serde(default)]
    pub methods: Vec<FuncPatchConfig>,
}

/// A patch entry qualified by its API group
///
/// In JSON the `Api` key sits next to the entry's own keys. The remaining keys are handed to the
/// entry type as one object, so its `deny_unknown_fields` still applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InApi<T> {
    /// API group, e.g. `UI.WindowsAndMessaging`
    pub api: String,
    /// The entry
    pub patch: T,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for InApi<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut entry = Map::<String, Value>::deserialize(deserializer)?;
        let api = match entry.remove("Api") {
            Some(Value::String(api)) => api,
            Some(other) => {
                return Err(de::Error::custom(format!("`Api` must be a string, got {other}")))
            }
            None => return Err(de::Error::missing_field("Api")),
        };
        let patch = T::deserialize(Value::Object(entry)).map_err(de::Error::custom)?;
        Ok(InApi { api, patch })
    }
}

impl<T> InApi<T> {
    /// `patch` for a definition of API group `api`
    pub fn new(api: &str, patch: T) -> Self {
        InApi {
            api: api.to_string(),
            patch,
        }
    }
}

/// All corrections of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PatchConfig {
    /// Constant corrections
    #[serde(default)]
    pub consts: Vec<ConstPatchConfig>,
    /// Type corrections
    #[serde(default)]
    pub types: Vec<InApi<TypePatchConfig>>,
    /// COM interface corrections
    #[serde(default)]
    pub com_types: Vec<InApi<ComTypePatchConfig>>,
    /// Function corrections
    #[serde(default)]
    pub funcs: Vec<InApi<FuncPatchConfig>>,
}

fn func(name: &str) -> FuncPatchConfig {
    FuncPatchConfig {
        name: name.to_string(),
        skip_params: false,
        return_type: None,
        params: Vec::new(),
    }
}

fn optional_return(name: &str) -> FuncPatchConfig {
    FuncPatchConfig {
        return_type: Some(ReturnTypePatchConfig { optional: true }),
        ..func(name)
    }
}

fn optional_param(name: &str, param: &str) -> FuncPatchConfig {
    FuncPatchConfig {
        params: vec![ParamPatchConfig {
            name: param.to_string(),
            optional: true,
            is_const: false,
        }],
        ..func(name)
    }
}

fn removed(name: &str) -> TypePatchConfig {
    TypePatchConfig {
        name: name.to_string(),
        remove: true,
        fields: Vec::new(),
        nested_types: Vec::new(),
    }
}

fn optional_fields(name: &str, fields: &[&str]) -> TypePatchConfig {
    TypePatchConfig {
        name: name.to_string(),
        remove: false,
        fields: fields
            .iter()
            .map(|field| FieldPatchConfig {
                name: (*field).to_string(),
                optional: true,
            })
            .collect(),
        nested_types: Vec::new(),
    }
}

impl PatchConfig {
    /// No corrections
    #[must_use]
    pub fn empty() -> Self {
        PatchConfig::default()
    }

    /// Corrections for the published `Windows.Win32.winmd`
    #[must_use]
    pub fn win32() -> Self {
        const WNDCLASS_FIELDS: &[&str] = &["hIcon", "hCursor", "hbrBackground", "lpszMenuName"];

        PatchConfig {
            consts: vec![ConstPatchConfig {
                api: "Devices.Usb".to_string(),
                name: "WinUSB_TestGuid".to_string(),
                duplicated: true,
            }],
            types: vec![
                InApi::new("UI.WindowsAndMessaging", optional_fields("WNDCLASSA", WNDCLASS_FIELDS)),
                InApi::new("UI.WindowsAndMessaging", optional_fields("WNDCLASSW", WNDCLASS_FIELDS)),
                InApi::new("System.Iis", removed("CONFIGURATION_ENTRY")),
                InApi::new("System.Iis", removed("LOGGING_PARAMETERS")),
                InApi::new("System.Iis", removed("PRE_PROCESS_PARAMETERS")),
                InApi::new("System.Iis", removed("POST_PROCESS_PARAMETERS")),
            ],
            com_types: vec![InApi::new(
                "NetworkManagement.NetManagement",
                ComTypePatchConfig {
                    name: "INetCfgComponentUpperEdge".to_string(),
                    methods: vec![FuncPatchConfig {
                        skip_params: true,
                        ..func("AddInterfacesToAdapter")
                    }],
                },
            )],
            funcs: vec![
                InApi::new("System.Memory", optional_return("CreateFileMappingA")),
                InApi::new("System.Memory", optional_return("CreateFileMappingW")),
                InApi::new("System.Memory", optional_return("MapViewOfFile")),
                InApi::new("System.Memory", optional_return("MapViewOfFileEx")),
                InApi::new("UI.WindowsAndMessaging", optional_param("ShowWindow", "hWnd")),
                InApi::new("UI.WindowsAndMessaging", optional_return("CreateWindowExA")),
                InApi::new("UI.WindowsAndMessaging", optional_return("CreateWindowExW")),
                InApi::new("Graphics.Gdi", optional_return("CreateFontA")),
                InApi::new("Graphics.Gdi", optional_return("CreateFontW")),
                InApi::new("System.Console", optional_param("WriteConsoleA", "lpReserved")),
                InApi::new("System.Console", optional_param("WriteConsoleW", "lpReserved")),
            ],
        }
    }

    /// Parse a JSON patch table
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] if `json` is not a valid patch table
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON patch table from disk
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read, or [`crate::Error::Json`]
    /// if it is not a valid patch table
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Append the entries of `other`. Entries naming the same definition are rejected once the
    /// overlay is built.
    pub fn merge(&mut self, other: PatchConfig) {
        self.consts.extend(other.consts);
        self.types.extend(other.types);
        self.com_types.extend(other.com_types);
        self.funcs.extend(other.funcs);
    }

    /// `true` if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consts.is_empty()
            && self.types.is_empty()
            && self.com_types.is_empty()
            && self.funcs.is_empty()
    }
}
