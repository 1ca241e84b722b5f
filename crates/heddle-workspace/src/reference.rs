//! Artefact references and the process-wide foundation reference cache.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::compiler::Compiler;

/// Where a reference comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceOrigin {
    /// Standard platform library.
    Foundation,
    /// The compiled artefact of another module in the workspace.
    Module(String),
    /// Supplied by the scenario.
    External,
}

/// A compiled artefact a module can import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    display: String,
    origin: ReferenceOrigin,
    exports: BTreeSet<String>,
}

impl ArtifactReference {
    /// Creates a reference exporting `exports`.
    #[must_use]
    pub fn new<I, S>(display: impl Into<String>, origin: ReferenceOrigin, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            display: display.into(),
            origin,
            exports: exports.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an external reference.
    #[must_use]
    pub fn external<I, S>(display: impl Into<String>, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(display, ReferenceOrigin::External, exports)
    }

    /// Display name.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Origin.
    #[must_use]
    pub const fn origin(&self) -> &ReferenceOrigin {
        &self.origin
    }

    /// Symbols made visible to importers.
    #[must_use]
    pub const fn exports(&self) -> &BTreeSet<String> {
        &self.exports
    }

    /// Returns true when the reference exports `symbol`.
    #[must_use]
    pub fn exports_symbol(&self, symbol: &str) -> bool {
        self.exports.contains(symbol)
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

const CACHE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::reference");

type FoundationCache = HashMap<String, Arc<[ArtifactReference]>>;

static FOUNDATION: Lazy<Mutex<FoundationCache>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the foundation references for the compiler's platform, computing
/// them on first use.
///
/// Entries are inserted once per platform key and never mutated afterwards.
#[must_use]
pub fn foundation_references(compiler: &dyn Compiler) -> Arc<[ArtifactReference]> {
    let mut cache = FOUNDATION.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(cached) = cache.get(compiler.platform()) {
        return Arc::clone(cached);
    }
    debug!(
        target: CACHE_TARGET,
        platform = compiler.platform(),
        "computing foundation references"
    );
    let computed: Arc<[ArtifactReference]> = compiler.foundation_references().into();
    cache.insert(compiler.platform().to_owned(), Arc::clone(&computed));
    computed
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::compiler::{CompileRequest, CompiledModule, CompilerError};

    struct CountingCompiler {
        platform: &'static str,
        computed: Cell<usize>,
    }

    impl Compiler for CountingCompiler {
        fn platform(&self) -> &str {
            self.platform
        }

        fn foundation_references(&self) -> Vec<ArtifactReference> {
            self.computed.set(self.computed.get() + 1);
            vec![ArtifactReference::new(
                "base",
                ReferenceOrigin::Foundation,
                ["Object"],
            )]
        }

        fn compile(&self, request: CompileRequest<'_>) -> Result<CompiledModule, CompilerError> {
            Err(CompilerError::new(request.descriptor.name(), "unused"))
        }
    }

    #[test]
    fn foundation_references_are_computed_once_per_platform() {
        let compiler = CountingCompiler {
            platform: "reference-cache-test",
            computed: Cell::new(0),
        };
        let first = foundation_references(&compiler);
        let second = foundation_references(&compiler);
        assert_eq!(compiler.computed.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.iter().any(|reference| reference.exports_symbol("Object")));
    }

    #[test]
    fn platforms_do_not_share_entries() {
        let left = CountingCompiler {
            platform: "reference-cache-left",
            computed: Cell::new(0),
        };
        let right = CountingCompiler {
            platform: "reference-cache-right",
            computed: Cell::new(0),
        };
        let _ = foundation_references(&left);
        let _ = foundation_references(&right);
        assert_eq!(left.computed.get(), 1);
        assert_eq!(right.computed.get(), 1);
    }
}
