//! Module descriptors: the declared shape of each module in a scenario.

/// Language-level options applied to a single module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageOptions {
    /// Language identifier handed to the compiler; `None` selects the
    /// compiler's default language.
    pub language: Option<String>,
    /// Enables stricter null analysis in compilers that support it.
    pub strict_null_checks: bool,
    /// Namespace assumed for units that do not declare one.
    pub default_namespace: Option<String>,
}

impl LanguageOptions {
    /// Sets the language identifier.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Enables or disables strict null checks.
    #[must_use]
    pub const fn with_strict_null_checks(mut self, enabled: bool) -> Self {
        self.strict_null_checks = enabled;
        self
    }

    /// Sets the default namespace.
    #[must_use]
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }
}

/// Declares one module of a scenario.
///
/// Dependencies keep their declaration order; repeated names collapse onto
/// the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    name: String,
    depends_on: Vec<String>,
    options: LanguageOptions,
}

impl ModuleDescriptor {
    /// Creates a descriptor with no dependencies and default options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            options: LanguageOptions::default(),
        }
    }

    /// Adds a dependency on another module.
    #[must_use]
    pub fn depends_on(mut self, module: impl Into<String>) -> Self {
        let dependency = module.into();
        if !self.depends_on.contains(&dependency) {
            self.depends_on.push(dependency);
        }
        self
    }

    /// Adds several dependencies in order.
    #[must_use]
    pub fn depends_on_all<I, S>(self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        modules
            .into_iter()
            .fold(self, |descriptor, module| descriptor.depends_on(module))
    }

    /// Replaces the module's language options.
    #[must_use]
    pub fn with_options(mut self, options: LanguageOptions) -> Self {
        self.options = options;
        self
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the modules this one depends on.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    /// Language options.
    #[must_use]
    pub const fn options(&self) -> &LanguageOptions {
        &self.options
    }
}
