//! Source tree to destination tree conversion
//!
//! This module contains the tree conversion engine, its configuration, the
//! external converter seam, and run statistics.

pub mod config;
pub mod converter;
pub mod engine;
pub mod stats;

pub use config::{ConverterOptions, ExtensionPolicy, TreeConfig};
pub use converter::{CommandConverter, Converter};
pub use engine::{convert_tree, ConversionReport, ConvertedFile, ReportSummary, TreeConverter};
pub use stats::TreeStatistics;
