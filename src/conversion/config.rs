//! Configuration options for tree conversion

pub use crate::mapping::ExtensionPolicy;

/// Options forwarded untouched to the external converter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Pretty-print the generated output
    pub pretty: bool,
    /// Literal string used for one level of indentation
    pub indent: Option<String>,
    /// Delimiter opening an embedded expression in the output
    pub left_delim: Option<String>,
    /// Delimiter closing an embedded expression in the output
    pub right_delim: Option<String>,
}

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    pub fn with_delimiters(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_delim = Some(left.into());
        self.right_delim = Some(right.into());
        self
    }
}

/// Tree conversion configuration
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Extension handling for destination files
    pub extension: ExtensionPolicy,
    /// Options passed to every converter call
    pub converter: ConverterOptions,
    /// Convert files concurrently
    pub parallel: bool,
    /// Follow symbolic links while walking the source tree
    pub follow_links: bool,
    /// Mode for directories created in the destination tree
    pub dir_mode: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            extension: ExtensionPolicy::Keep,
            converter: ConverterOptions::default(),
            parallel: false,
            follow_links: false,
            dir_mode: 0o755,
        }
    }
}

impl TreeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extension policy
    pub fn with_extension(mut self, extension: ExtensionPolicy) -> Self {
        self.extension = extension;
        self
    }

    /// Set converter options
    pub fn with_converter_options(mut self, options: ConverterOptions) -> Self {
        self.converter = options;
        self
    }

    /// Enable/disable concurrent conversion
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable/disable following symlinks
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set the mode for created directories
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if let ExtensionPolicy::Force(ext) = &self.extension {
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() {
                return Err("Target extension must not be empty".to_string());
            }
            if ext.contains(std::path::is_separator) {
                return Err(format!("Target extension '{}' contains a path separator", ext));
            }
        }

        if self.dir_mode > 0o7777 {
            return Err(format!("Invalid directory mode {:o}", self.dir_mode));
        }

        // Directories we create must stay traversable by their owner
        if self.dir_mode & 0o700 != 0o700 {
            return Err(format!(
                "Directory mode {:o} must grant the owner read, write and execute",
                self.dir_mode
            ));
        }

        Ok(())
    }
}
