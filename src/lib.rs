//! Template tree converter
//!
//! Mirrors a source directory tree into a destination tree, running every
//! regular file through an external converter and writing the result under
//! the corresponding destination path. Per-file failures are collected rather
//! than aborting the walk.

pub mod cli;
pub mod conversion;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod walk;

// Re-export commonly used types
pub use conversion::{
    convert_tree, CommandConverter, ConversionReport, Converter, ConverterOptions,
    ExtensionPolicy, TreeConfig, TreeConverter,
};
pub use error::{ConversionError, Stage, TreeError, TreeResult};
pub use mapping::{compute_base_path, map_path, PathMapper};
