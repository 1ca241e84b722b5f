//! The in-memory project graph a scenario runs against.

use std::collections::BTreeMap;
use std::fmt;

use camino::Utf8PathBuf;

use crate::compiler::{CompileDiagnostic, CompiledModule, Severity};
use crate::module::ModuleDescriptor;
use crate::reference::ArtifactReference;

/// Identifies a unit by module, folder chain and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    module: String,
    folders: Vec<String>,
    name: String,
}

impl UnitKey {
    /// Creates a unit key.
    #[must_use]
    pub fn new(module: impl Into<String>, folders: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            folders,
            name: name.into(),
        }
    }

    /// Owning module.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Folder chain below the module.
    #[must_use]
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative path of the unit, `Module/Folder/.../Unit`.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        let mut path = Utf8PathBuf::from(&self.module);
        for folder in &self.folders {
            path.push(folder);
        }
        path.push(&self.name);
        path
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module)?;
        for folder in &self.folders {
            write!(f, "/{folder}")?;
        }
        write!(f, "/{}", self.name)
    }
}

/// A source unit held by the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    key: UnitKey,
    path: Utf8PathBuf,
    text: String,
}

impl SourceUnit {
    /// Creates a unit from its key and text.
    #[must_use]
    pub fn new(key: UnitKey, text: impl Into<String>) -> Self {
        let path = key.path();
        Self {
            key,
            path,
            text: text.into(),
        }
    }

    /// Unit key.
    #[must_use]
    pub const fn key(&self) -> &UnitKey {
        &self.key
    }

    /// Relative path of the unit.
    #[must_use]
    pub fn path(&self) -> &camino::Utf8Path {
        &self.path
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A module of the workspace with its units, imports and compile result.
#[derive(Debug, Clone)]
pub struct Module {
    descriptor: ModuleDescriptor,
    units: BTreeMap<UnitKey, SourceUnit>,
    references: Vec<ArtifactReference>,
    compiled: Option<CompiledModule>,
}

impl Module {
    pub(crate) const fn new(descriptor: ModuleDescriptor) -> Self {
        Self {
            descriptor,
            units: BTreeMap::new(),
            references: Vec::new(),
            compiled: None,
        }
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Descriptor the module was built from.
    #[must_use]
    pub const fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    /// Units ordered by key.
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units.values()
    }

    /// References imported before compilation.
    #[must_use]
    pub fn references(&self) -> &[ArtifactReference] {
        &self.references
    }

    /// Compile result, once the module has been compiled.
    #[must_use]
    pub const fn compiled(&self) -> Option<&CompiledModule> {
        self.compiled.as_ref()
    }

    /// All compile diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[CompileDiagnostic] {
        self.compiled
            .as_ref()
            .map_or(&[], |compiled| compiled.diagnostics())
    }

    /// Compile diagnostics of error severity.
    pub fn errors(&self) -> impl Iterator<Item = &CompileDiagnostic> {
        self.diagnostics()
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Error)
    }

    pub(crate) fn set_references(&mut self, references: Vec<ArtifactReference>) {
        self.references = references;
    }

    pub(crate) fn set_compiled(&mut self, compiled: CompiledModule) {
        self.compiled = Some(compiled);
    }
}

/// The project graph: modules keyed by name, in name order.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    modules: BTreeMap<String, Module>,
    compile_order: Vec<String>,
    version: u64,
}

impl Workspace {
    pub(crate) fn add_module(&mut self, module: Module) {
        self.modules.insert(module.name().to_owned(), module);
    }

    pub(crate) fn module_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.modules.get_mut(name)
    }

    pub(crate) fn record_compiled(&mut self, name: &str) {
        self.compile_order.push(name.to_owned());
    }

    /// Modules in name order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Order in which modules were compiled.
    #[must_use]
    pub fn compile_order(&self) -> &[String] {
        &self.compile_order
    }

    /// Number of change sets applied so far.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Looks up a unit by key.
    #[must_use]
    pub fn unit(&self, key: &UnitKey) -> Option<&SourceUnit> {
        self.modules.get(key.module())?.units.get(key)
    }

    /// Finds the first unit named `name` in any module.
    #[must_use]
    pub fn find_unit(&self, name: &str) -> Option<&SourceUnit> {
        self.units().find(|unit| unit.key().name() == name)
    }

    /// Every unit of every module, in module then key order.
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.modules.values().flat_map(Module::units)
    }

    /// Adds a unit. Returns false when the module is unknown or the unit
    /// already exists.
    pub fn insert_unit(&mut self, unit: SourceUnit) -> bool {
        let Some(module) = self.modules.get_mut(unit.key().module()) else {
            return false;
        };
        if module.units.contains_key(unit.key()) {
            return false;
        }
        module.units.insert(unit.key().clone(), unit);
        true
    }

    /// Removes a unit, returning it if it existed.
    pub fn remove_unit(&mut self, key: &UnitKey) -> Option<SourceUnit> {
        self.modules.get_mut(key.module())?.units.remove(key)
    }

    /// Replaces a unit's text. Returns false when the unit does not exist.
    pub fn replace_text(&mut self, key: &UnitKey, text: impl Into<String>) -> bool {
        let Some(unit) = self
            .modules
            .get_mut(key.module())
            .and_then(|module| module.units.get_mut(key))
        else {
            return false;
        };
        unit.text = text.into();
        true
    }

    /// Marks the end of an applied change set.
    pub const fn advance_version(&mut self) {
        self.version += 1;
    }
}
