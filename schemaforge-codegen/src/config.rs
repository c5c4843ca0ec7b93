//! Generator configuration.

/// Default marker line placed at the top of every generated file.
pub const DEFAULT_HEADER: &str = "// Code generated by schemaforge. DO NOT EDIT.";

/// Options controlling one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Wrap the declarations in `pub mod <package>`.
    pub package: Option<String>,
    /// Name of untitled roots that have no file stem.
    pub root_name: String,
    /// Marker line written before the code.
    pub header: String,
    /// Extra derives added to every struct.
    pub derive_extra: Vec<String>,
    /// Emit `description` as doc comments.
    pub docs: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: None,
            root_name: "Root".to_string(),
            header: DEFAULT_HEADER.to_string(),
            derive_extra: Vec::new(),
            docs: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wrapping module name.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Sets the fallback root name.
    #[must_use]
    pub fn root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// Sets the marker line.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Adds an extra derive.
    #[must_use]
    pub fn derive(mut self, derive: impl Into<String>) -> Self {
        self.derive_extra.push(derive.into());
        self
    }

    /// Enables or disables doc comments.
    #[must_use]
    pub fn docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }
}
