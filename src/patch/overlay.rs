//! The patch tree consulted during classification.
//!
//! Every node built from a [`PatchConfig`] entry gets a [`PatchId`]. Lookups that miss return a
//! shared empty node without an id, lookups that hit bump the node's counter in the run's
//! [`PatchCounters`]. After classification [`PatchOverlay::validate`] reports every node that was
//! never reached and every `Duplicated` constant whose second definition never showed up.

use std::collections::BTreeMap;

use crate::{
    patch::config::{
        ComTypePatchConfig, FieldPatchConfig, FuncPatchConfig, ParamPatchConfig, PatchConfig,
        TypePatchConfig,
    },
    Result,
};

/// Identity of a configured patch node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchId(usize);

/// Apply counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchCounters {
    applied: Vec<u32>,
    observed: Vec<bool>,
}

impl PatchCounters {
    fn hit(&mut self, id: Option<PatchId>) {
        if let Some(PatchId(index)) = id {
            self.applied[index] += 1;
        }
    }

    fn observe(&mut self, id: Option<PatchId>) {
        if let Some(PatchId(index)) = id {
            self.observed[index] = true;
        }
    }

    /// How often the node `id` was looked up
    #[must_use]
    pub fn applied(&self, id: PatchId) -> u32 {
        self.applied[id.0]
    }

    /// Total number of lookups that hit a configured node
    #[must_use]
    pub fn total(&self) -> u64 {
        self.applied.iter().map(|count| u64::from(*count)).sum()
    }
}

/// Correction for a free constant
#[derive(Debug, PartialEq, Eq)]
pub struct ConstPatch {
    id: Option<PatchId>,
    /// The constant is defined twice
    pub duplicated: bool,
}

impl ConstPatch {
    /// Called for the second definition of the constant; `true` if it is expected and should be
    /// dropped
    pub fn accept_duplicate(&self, counters: &mut PatchCounters) -> bool {
        if self.duplicated {
            counters.observe(self.id);
        }
        self.duplicated
    }
}

/// Correction for a struct or union field
#[derive(Debug, PartialEq, Eq)]
pub struct FieldPatch {
    id: Option<PatchId>,
    /// Mark the field optional
    pub optional: bool,
}

/// Correction for a parameter
#[derive(Debug, PartialEq, Eq)]
pub struct ParamPatch {
    id: Option<PatchId>,
    /// Mark the parameter optional
    pub optional: bool,
    /// Mark the parameter const
    pub is_const: bool,
}

/// Correction for a return value
#[derive(Debug, PartialEq, Eq)]
pub struct ReturnTypePatch {
    id: Option<PatchId>,
    /// Mark the return value optional
    pub optional: bool,
}

/// Correction for a function or COM method
#[derive(Debug, PartialEq, Eq)]
pub struct FuncPatch {
    id: Option<PatchId>,
    /// Ignore the parameter rows
    pub skip_params: bool,
    return_type: Option<ReturnTypePatch>,
    params: BTreeMap<String, ParamPatch>,
}

impl FuncPatch {
    /// The shared node of functions without corrections
    #[must_use]
    pub fn none() -> &'static FuncPatch {
        &EMPTY_FUNC
    }

    /// The return value correction
    pub fn return_type(&self, counters: &mut PatchCounters) -> &ReturnTypePatch {
        match &self.return_type {
            Some(patch) => {
                counters.hit(patch.id);
                patch
            }
            None => &EMPTY_RETURN_TYPE,
        }
    }

    /// The correction for parameter `name`
    pub fn param(&self, name: &str, counters: &mut PatchCounters) -> &ParamPatch {
        lookup(&self.params, name, counters, |patch| patch.id).unwrap_or(&EMPTY_PARAM)
    }
}

/// Correction for a type
#[derive(Debug, PartialEq, Eq)]
pub struct TypePatch {
    id: Option<PatchId>,
    /// Leave the type out
    pub remove: bool,
    /// Configured as a COM interface
    pub is_com: bool,
    fields: BTreeMap<String, FieldPatch>,
    nested_types: BTreeMap<String, TypePatch>,
    methods: BTreeMap<String, FuncPatch>,
}

impl TypePatch {
    /// The shared node of types without corrections
    #[must_use]
    pub fn none() -> &'static TypePatch {
        &EMPTY_TYPE
    }

    /// `true` for the shared empty node
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }

    /// The correction for field `name`
    pub fn field(&self, name: &str, counters: &mut PatchCounters) -> &FieldPatch {
        lookup(&self.fields, name, counters, |patch| patch.id).unwrap_or(&EMPTY_FIELD)
    }

    /// The correction for nested type `name`
    pub fn nested(&self, name: &str, counters: &mut PatchCounters) -> &TypePatch {
        lookup(&self.nested_types, name, counters, |patch| patch.id).unwrap_or(&EMPTY_TYPE)
    }

    /// The correction for COM method `name`
    pub fn method(&self, name: &str, counters: &mut PatchCounters) -> &FuncPatch {
        lookup(&self.methods, name, counters, |patch| patch.id).unwrap_or(&EMPTY_FUNC)
    }
}

/// Corrections for one API group
#[derive(Debug, PartialEq, Eq)]
pub struct ApiPatch {
    id: Option<PatchId>,
    consts: BTreeMap<String, ConstPatch>,
    types: BTreeMap<String, TypePatch>,
    funcs: BTreeMap<String, FuncPatch>,
}

impl ApiPatch {
    fn new(id: PatchId) -> Self {
        ApiPatch {
            id: Some(id),
            consts: BTreeMap::new(),
            types: BTreeMap::new(),
            funcs: BTreeMap::new(),
        }
    }

    /// The correction for constant `name`
    pub fn constant(&self, name: &str, counters: &mut PatchCounters) -> &ConstPatch {
        lookup(&self.consts, name, counters, |patch| patch.id).unwrap_or(&EMPTY_CONST)
    }

    /// The correction for top-level type `name`
    pub fn ty(&self, name: &str, counters: &mut PatchCounters) -> &TypePatch {
        lookup(&self.types, name, counters, |patch| patch.id).unwrap_or(&EMPTY_TYPE)
    }

    /// The correction for free function `name`
    pub fn func(&self, name: &str, counters: &mut PatchCounters) -> &FuncPatch {
        lookup(&self.funcs, name, counters, |patch| patch.id).unwrap_or(&EMPTY_FUNC)
    }

    /// `true` if `name` is a removed top-level type; does not count as a lookup
    #[must_use]
    pub fn is_removed(&self, name: &str) -> bool {
        self.types.get(name).is_some_and(|patch| patch.remove)
    }
}

static EMPTY_CONST: ConstPatch = ConstPatch {
    id: None,
    duplicated: false,
};
static EMPTY_FIELD: FieldPatch = FieldPatch {
    id: None,
    optional: false,
};
static EMPTY_PARAM: ParamPatch = ParamPatch {
    id: None,
    optional: false,
    is_const: false,
};
static EMPTY_RETURN_TYPE: ReturnTypePatch = ReturnTypePatch {
    id: None,
    optional: false,
};
static EMPTY_FUNC: FuncPatch = FuncPatch {
    id: None,
    skip_params: false,
    return_type: None,
    params: BTreeMap::new(),
};
static EMPTY_TYPE: TypePatch = TypePatch {
    id: None,
    remove: false,
    is_com: false,
    fields: BTreeMap::new(),
    nested_types: BTreeMap::new(),
    methods: BTreeMap::new(),
};
static EMPTY_API: ApiPatch = ApiPatch {
    id: None,
    consts: BTreeMap::new(),
    types: BTreeMap::new(),
    funcs: BTreeMap::new(),
};

fn lookup<'a, T>(
    map: &'a BTreeMap<String, T>,
    name: &str,
    counters: &mut PatchCounters,
    id: impl Fn(&T) -> Option<PatchId>,
) -> Option<&'a T> {
    let patch = map.get(name)?;
    counters.hit(id(patch));
    Some(patch)
}

fn insert_unique<T>(map: &mut BTreeMap<String, T>, name: &str, patch: T, what: &str) -> Result<()> {
    if map.insert(name.to_string(), patch).is_some() {
        return Err(patch_violation!("{} '{}' is patched twice", what, name));
    }
    Ok(())
}

/// The immutable patch tree of a [`PatchConfig`].
#[derive(Debug, PartialEq, Eq, Default)]
pub struct PatchOverlay {
    apis: BTreeMap<String, ApiPatch>,
    node_count: usize,
}

impl PatchOverlay {
    /// Build the tree
    ///
    /// # Errors
    /// Returns [`crate::Error::PatchViolation`] if two entries name the same definition, or an
    /// entry carries no correction at all
    pub fn new(config: &PatchConfig) -> Result<Self> {
        let mut overlay = PatchOverlay::default();

        for entry in &config.consts {
            if !entry.duplicated {
                return Err(patch_violation!("constant '{}' has no correction", entry.name));
            }
            let id = overlay.next_id();
            let patch = ConstPatch {
                id: Some(id),
                duplicated: entry.duplicated,
            };
            let api = overlay.api_mut(&entry.api);
            insert_unique(&mut api.consts, &entry.name, patch, "constant")?;
        }

        for entry in &config.types {
            let patch = overlay.type_patch(&entry.patch)?;
            let api = overlay.api_mut(&entry.api);
            insert_unique(&mut api.types, &entry.patch.name, patch, "type")?;
        }

        for entry in &config.com_types {
            let patch = overlay.com_type_patch(&entry.patch)?;
            let api = overlay.api_mut(&entry.api);
            insert_unique(&mut api.types, &entry.patch.name, patch, "type")?;
        }

        for entry in &config.funcs {
            let patch = overlay.func_patch(&entry.patch)?;
            let api = overlay.api_mut(&entry.api);
            insert_unique(&mut api.funcs, &entry.patch.name, patch, "function")?;
        }

        Ok(overlay)
    }

    /// Fresh counters for one run
    #[must_use]
    pub fn counters(&self) -> PatchCounters {
        PatchCounters {
            applied: vec![0; self.node_count],
            observed: vec![false; self.node_count],
        }
    }

    /// Number of configured nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.node_count
    }

    /// `true` if nothing is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// The corrections of API group `name`
    pub fn api(&self, name: &str, counters: &mut PatchCounters) -> &ApiPatch {
        lookup(&self.apis, name, counters, |patch| patch.id).unwrap_or(&EMPTY_API)
    }

    /// Report stale patches
    ///
    /// # Errors
    /// Returns [`crate::Error::PatchViolation`] naming the first node that was never applied, or
    /// the first `Duplicated` constant whose duplicate never appeared
    pub fn validate(&self, counters: &PatchCounters) -> Result<()> {
        for (name, api) in &self.apis {
            check(counters, api.id, || format!("API '{name}'"))?;

            for (const_name, patch) in &api.consts {
                let path = || format!("constant '{name}.{const_name}'");
                check(counters, patch.id, path)?;
                if let Some(PatchId(index)) = patch.id {
                    if patch.duplicated && !counters.observed[index] {
                        return Err(patch_violation!(
                            "{} is marked duplicated but was only defined once",
                            path()
                        ));
                    }
                }
            }

            for (type_name, patch) in &api.types {
                validate_type(counters, patch, &format!("{name}.{type_name}"))?;
            }

            for (func_name, patch) in &api.funcs {
                validate_func(counters, patch, &format!("{name}.{func_name}"))?;
            }
        }

        Ok(())
    }

    fn next_id(&mut self) -> PatchId {
        let id = PatchId(self.node_count);
        self.node_count += 1;
        id
    }

    fn api_mut(&mut self, name: &str) -> &mut ApiPatch {
        let next = PatchId(self.node_count);
        let api = self
            .apis
            .entry(name.to_string())
            .or_insert_with(|| ApiPatch::new(next));
        if api.id == Some(next) {
            self.node_count += 1;
        }
        api
    }

    fn type_patch(&mut self, config: &TypePatchConfig) -> Result<TypePatch> {
        if config.remove && !(config.fields.is_empty() && config.nested_types.is_empty()) {
            return Err(patch_violation!(
                "type '{}' is removed and patched at the same time",
                config.name
            ));
        }
        if !config.remove && config.fields.is_empty() && config.nested_types.is_empty() {
            return Err(patch_violation!("type '{}' has no correction", config.name));
        }

        let id = self.next_id();
        let mut fields = BTreeMap::new();
        for field in &config.fields {
            let patch = self.field_patch(field)?;
            insert_unique(&mut fields, &field.name, patch, "field")?;
        }
        let mut nested_types = BTreeMap::new();
        for nested in &config.nested_types {
            let patch = self.type_patch(nested)?;
            insert_unique(&mut nested_types, &nested.name, patch, "nested type")?;
        }

        Ok(TypePatch {
            id: Some(id),
            remove: config.remove,
            is_com: false,
            fields,
            nested_types,
            methods: BTreeMap::new(),
        })
    }

    fn com_type_patch(&mut self, config: &ComTypePatchConfig) -> Result<TypePatch> {
        if config.methods.is_empty() {
            return Err(patch_violation!("COM type '{}' has no correction", config.name));
        }

        let id = self.next_id();
        let mut methods = BTreeMap::new();
        for method in &config.methods {
            let patch = self.func_patch(method)?;
            insert_unique(&mut methods, &method.name, patch, "method")?;
        }

        Ok(TypePatch {
            id: Some(id),
            remove: false,
            is_com: true,
            fields: BTreeMap::new(),
            nested_types: BTreeMap::new(),
            methods,
        })
    }

    fn field_patch(&mut self, config: &FieldPatchConfig) -> Result<FieldPatch> {
        if !config.optional {
            return Err(patch_violation!("field '{}' has no correction", config.name));
        }
        Ok(FieldPatch {
            id: Some(self.next_id()),
            optional: config.optional,
        })
    }

    fn param_patch(&mut self, config: &ParamPatchConfig) -> Result<ParamPatch> {
        if !config.optional && !config.is_const {
            return Err(patch_violation!("parameter '{}' has no correction", config.name));
        }
        Ok(ParamPatch {
            id: Some(self.next_id()),
            optional: config.optional,
            is_const: config.is_const,
        })
    }

    fn func_patch(&mut self, config: &FuncPatchConfig) -> Result<FuncPatch> {
        let return_type = match &config.return_type {
            Some(return_type) if !return_type.optional => {
                return Err(patch_violation!(
                    "return type of '{}' has no correction",
                    config.name
                ));
            }
            Some(return_type) => Some(return_type.optional),
            None => None,
        };
        if !config.skip_params && return_type.is_none() && config.params.is_empty() {
            return Err(patch_violation!("function '{}' has no correction", config.name));
        }
        if config.skip_params && !config.params.is_empty() {
            return Err(patch_violation!(
                "function '{}' skips its parameters and patches them at the same time",
                config.name
            ));
        }

        let id = self.next_id();
        let return_type = return_type.map(|optional| ReturnTypePatch {
            id: Some(self.next_id()),
            optional,
        });
        let mut params = BTreeMap::new();
        for param in &config.params {
            let patch = self.param_patch(param)?;
            insert_unique(&mut params, &param.name, patch, "parameter")?;
        }

        Ok(FuncPatch {
            id: Some(id),
            skip_params: config.skip_params,
            return_type,
            params,
        })
    }
}

fn check(counters: &PatchCounters, id: Option<PatchId>, path: impl Fn() -> String) -> Result<()> {
    match id {
        Some(id) if counters.applied(id) == 0 => Err(patch_violation!(
            "patch for {} was never applied",
            path()
        )),
        _ => Ok(()),
    }
}

fn validate_type(counters: &PatchCounters, patch: &TypePatch, path: &str) -> Result<()> {
    check(counters, patch.id, || format!("type '{path}'"))?;
    for (name, field) in &patch.fields {
        check(counters, field.id, || format!("field '{path}.{name}'"))?;
    }
    for (name, nested) in &patch.nested_types {
        validate_type(counters, nested, &format!("{path}+{name}"))?;
    }
    for (name, method) in &patch.methods {
        validate_func(counters, method, &format!("{path}.{name}"))?;
    }
    Ok(())
}

fn validate_func(counters: &PatchCounters, patch: &FuncPatch, path: &str) -> Result<()> {
    check(counters, patch.id, || format!("function '{path}'"))?;
    if let Some(return_type) = &patch.return_type {
        check(counters, return_type.id, || format!("return type of '{path}'"))?;
    }
    for (name, param) in &patch.params {
        check(counters, param.id, || format!("parameter '{name}' of '{path}'"))?;
    }
    Ok(())
}
