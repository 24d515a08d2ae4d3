//! End-to-end runs over in-memory metadata: graph, classification, patches and documents.

mod common;

use common::Win32Metadata;
use win32json::{
    classify::TypeKind,
    generator::{Generator, GeneratorOptions},
    metadata::{flags::ParamAttributes, signatures::TypeSignature},
    patch::{ConstPatchConfig, FuncPatchConfig, InApi, ParamPatchConfig, PatchConfig},
    prelude::*,
    typesystem::NativeType,
};

fn usb_patches() -> PatchConfig {
    PatchConfig {
        consts: vec![ConstPatchConfig {
            api: "Devices.Usb".to_string(),
            name: "WinUSB_TestGuid".to_string(),
            duplicated: true,
        }],
        ..PatchConfig::empty()
    }
}

fn options(patches: PatchConfig) -> GeneratorOptions {
    GeneratorOptions {
        patches,
        skipped_namespaces: Vec::new(),
        keep_existing: false,
    }
}

fn read_document(dir: &std::path::Path, api: &str) -> serde_json::Value {
    let text = std::fs::read_to_string(dir.join(format!("{api}.json"))).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_generate_sample_documents() -> Result<()> {
    let md = Win32Metadata::sample()?;
    let dir = tempfile::tempdir().unwrap();

    let summary = Generator::new(&md.builder, options(usb_patches())).write(dir.path())?;
    let names: Vec<_> = summary
        .files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "Devices.Usb.json",
            "Foundation.json",
            "System.Com.json",
            "UI.WindowsAndMessaging.json"
        ]
    );

    let foundation = read_document(dir.path(), "Foundation");
    assert_eq!(foundation["Constants"][0]["Name"], "MAX_PATH");
    assert_eq!(foundation["Constants"][0]["ValueType"], "UInt32");
    assert_eq!(foundation["Constants"][0]["Value"], 260);
    assert_eq!(foundation["Types"][0]["Name"], "HWND");
    assert_eq!(foundation["Types"][0]["Kind"], "NativeTypedef");
    assert_eq!(
        foundation["Types"][0]["Def"],
        serde_json::json!({ "Kind": "Native", "Name": "IntPtr" })
    );
    assert_eq!(foundation["Types"][2]["Kind"], "Struct");
    assert_eq!(foundation["Types"][2]["Fields"][1]["Name"], "y");

    let ui = read_document(dir.path(), "UI.WindowsAndMessaging");
    assert_eq!(ui["Types"][0]["Kind"], "Enum");
    assert_eq!(ui["Types"][0]["Values"][1]["Name"], "SW_SHOWNORMAL");
    assert_eq!(
        ui["Types"][1]["Fields"][1]["Type"],
        serde_json::json!({
            "Kind": "ApiRef",
            "Name": "POINT",
            "TargetKind": "Default",
            "Api": "Foundation",
            "Parents": []
        })
    );
    assert_eq!(ui["Functions"][0]["Name"], "ShowWindow");
    assert_eq!(ui["Functions"][0]["DllImport"], "USER32.dll");
    assert_eq!(ui["Functions"][0]["Params"][0]["Attrs"], serde_json::json!(["In"]));
    assert_eq!(ui["UnicodeAliases"], serde_json::json!(["MessageBox"]));

    let usb = read_document(dir.path(), "Devices.Usb");
    assert_eq!(usb["Constants"].as_array().unwrap().len(), 1);
    assert_eq!(usb["Constants"][0]["Value"], "da812bff-12c3-46a2-8e2b-dbd3b7834c43");

    let com = read_document(dir.path(), "System.Com");
    assert_eq!(com["Types"][0]["Kind"], "Com");
    assert_eq!(com["Types"][0]["Guid"], "00000000-0000-0000-c000-000000000046");
    assert_eq!(com["Types"][0]["Methods"][0]["Name"], "Release");
    Ok(())
}

#[test]
fn test_documents_are_tab_indented() -> Result<()> {
    let md = Win32Metadata::sample()?;
    let dir = tempfile::tempdir().unwrap();
    Generator::new(&md.builder, options(usb_patches())).write(dir.path())?;

    let text = std::fs::read_to_string(dir.path().join("Foundation.json")).unwrap();
    assert!(text.starts_with("{\n\t\"Constants\": [\n\t\t{"));
    assert!(text.ends_with("}\n"));
    Ok(())
}

#[test]
fn test_duplicate_constant_without_patch() -> Result<()> {
    let md = Win32Metadata::sample()?;
    let error = Generator::new(&md.builder, options(PatchConfig::empty()))
        .generate()
        .unwrap_err();
    assert!(error.is_data_violation());
    Ok(())
}

#[test]
fn test_builtin_patches_are_stale_for_a_partial_winmd() -> Result<()> {
    let md = Win32Metadata::sample()?;
    let error = Generator::new(&md.builder, GeneratorOptions::default())
        .generate()
        .unwrap_err();
    assert!(error.is_patch_violation());
    Ok(())
}

#[test]
fn test_optional_param_patch() -> Result<()> {
    let md = Win32Metadata::sample()?;
    let mut patches = usb_patches();
    patches.funcs.push(InApi::new(
        "UI.WindowsAndMessaging",
        FuncPatchConfig {
            name: "ShowWindow".to_string(),
            skip_params: false,
            return_type: None,
            params: vec![ParamPatchConfig {
                name: "hWnd".to_string(),
                optional: true,
                is_const: false,
            }],
        },
    ));

    let generated = Generator::new(&md.builder, options(patches)).generate()?;
    let (_, ui) = generated
        .apis
        .iter()
        .find(|(name, _)| name == "UI.WindowsAndMessaging")
        .unwrap();
    let attrs = serde_json::to_value(&ui.functions[0].params[0].attrs).unwrap();
    assert_eq!(attrs, serde_json::json!(["In", "Optional"]));
    Ok(())
}

#[test]
fn test_patching_an_optional_param_again() -> Result<()> {
    let mut md = Win32Metadata::new();
    let apis = md.apis("UI.WindowsAndMessaging");
    md.function(
        apis,
        "GetMessageW",
        "USER32.dll",
        TypeSignature::I4,
        &[("hWnd", TypeSignature::I, ParamAttributes::IN | ParamAttributes::OPTIONAL)],
    )?;

    let patches = PatchConfig {
        funcs: vec![InApi::new(
            "UI.WindowsAndMessaging",
            FuncPatchConfig {
                name: "GetMessageW".to_string(),
                skip_params: false,
                return_type: None,
                params: vec![ParamPatchConfig {
                    name: "hWnd".to_string(),
                    optional: true,
                    is_const: false,
                }],
            },
        )],
        ..PatchConfig::empty()
    };
    let error = Generator::new(&md.builder, options(patches))
        .generate()
        .unwrap_err();
    assert!(error.is_patch_violation());
    Ok(())
}

#[test]
fn test_com_interface_with_guid() -> Result<()> {
    let mut md = Win32Metadata::new();
    let foo = md.interface("System.Com", "IFoo", Some("12345678-1234-1234-1234-123456789abc"))?;
    md.com_method(foo, "Bar", TypeSignature::I4, &[])?;

    let generated = Generator::new(&md.builder, options(PatchConfig::empty())).generate()?;
    let record = &generated.apis[0].1.types[0];
    match &record.kind {
        TypeKind::Com { guid, methods, .. } => {
            assert_eq!(
                guid.map(|guid| guid.to_string()),
                Some("12345678-1234-1234-1234-123456789abc".to_string())
            );
            assert_eq!(methods.len(), 1);
        }
        other => panic!("expected a COM interface, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_native_typedef_of_int32() -> Result<()> {
    let mut md = Win32Metadata::new();
    md.typedef("Foundation", "BOOL", TypeSignature::I4)?;

    let generated = Generator::new(&md.builder, options(PatchConfig::empty())).generate()?;
    match &generated.apis[0].1.types[0].kind {
        TypeKind::NativeTypedef { def, .. } => {
            assert_eq!(*def, TypeRef::native(NativeType::Int32));
        }
        other => panic!("expected a native typedef, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_graph_build_is_deterministic() -> Result<()> {
    let md = Win32Metadata::sample()?;
    let first = GraphBuilder::new(&md.builder).build()?;
    let second = GraphBuilder::new(&md.builder).build()?;
    assert_eq!(first, second);
    assert_eq!(first.groups().count(), 4);
    Ok(())
}

#[test]
fn test_failed_run_keeps_old_documents() -> Result<()> {
    let md = Win32Metadata::sample()?;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Foundation.json"), "old").unwrap();

    assert!(Generator::new(&md.builder, options(PatchConfig::empty()))
        .write(dir.path())
        .is_err());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("Foundation.json")).unwrap(),
        "old"
    );
    Ok(())
}
