//! Configuration for Java emission.

/// Configuration for Java emission.
#[derive(Clone, Debug)]
pub struct Config {
    /// Package prepended to every Slice module path
    pub(crate) package_prefix: Option<String>,
    /// Whether to emit `_XTie` classes
    pub(crate) tie: bool,
    /// Whether to start each file with a "generated" comment
    pub(crate) header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_prefix: None,
            tie: false,
            header: true,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the package prepended to Slice module paths.
    pub fn package_prefix(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.package_prefix = (!value.is_empty()).then_some(value);
        self
    }

    /// Set whether to emit tie classes.
    pub fn tie(mut self, value: bool) -> Self {
        self.tie = value;
        self
    }

    /// Set whether to emit the generated-file header comment.
    pub fn header(mut self, value: bool) -> Self {
        self.header = value;
        self
    }
}
