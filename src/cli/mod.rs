//! Command-line interface module

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::conversion::{
    CommandConverter, ConversionReport, ConverterOptions, ExtensionPolicy, TreeConfig,
    TreeStatistics,
};
use crate::error::{Stage, TreeError, TreeResult};

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "tplconv")]
#[command(about = "Convert a tree of template files into a mirrored output tree")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Source file or directory to convert
    #[arg(value_name = "SRC")]
    pub source: PathBuf,

    /// Destination path the converted tree is written under
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Pretty print the converted output
    #[arg(long)]
    pub pretty: bool,

    /// String used for one indentation level, e.g. "    " for 4 spaces
    #[arg(long = "indent-str", value_name = "STR")]
    pub indent_str: Option<String>,

    /// Delimiter that opens an expression in the output template
    #[arg(long = "left-delim", value_name = "DELIM")]
    pub left_delim: Option<String>,

    /// Delimiter that closes an expression in the output template
    #[arg(long = "right-delim", value_name = "DELIM")]
    pub right_delim: Option<String>,

    /// Replace the extension of every output file (default: keep it)
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,

    /// Converter program, invoked as `PROGRAM [ARGS...] <source file>`
    #[arg(long, value_name = "PROGRAM", default_value = "pug")]
    pub converter: String,

    /// Extra argument passed to the converter program (repeatable)
    #[arg(long = "converter-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub converter_args: Vec<String>,

    /// Convert files concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Follow symbolic links in the source tree
    #[arg(long)]
    pub follow_links: bool,

    /// Output conversion statistics
    #[arg(long)]
    pub stats: bool,

    /// Print the conversion report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Default log filter for these flags; `RUST_LOG` overrides it
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Whether a progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.verbose && !self.json && atty::is(atty::Stream::Stderr)
    }
}

/// Create tree configuration from CLI arguments
pub fn create_tree_config(args: &Args) -> TreeResult<TreeConfig> {
    let options = ConverterOptions {
        pretty: args.pretty,
        indent: args.indent_str.clone(),
        left_delim: args.left_delim.clone(),
        right_delim: args.right_delim.clone(),
    };

    let config = TreeConfig::new()
        .with_extension(ExtensionPolicy::from_option(args.ext.clone()))
        .with_converter_options(options)
        .with_parallel(args.parallel)
        .with_follow_links(args.follow_links);

    config.validate().map_err(TreeError::configuration)?;

    Ok(config)
}

/// Create the external converter from CLI arguments
pub fn create_converter(args: &Args) -> CommandConverter {
    CommandConverter::new(&args.converter).args(&args.converter_args)
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for file processing
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new(total);
        let style = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            if Self::should_use_color() {
                println!("{} {}", console::style("✓").green(), message);
            } else {
                println!("✓ {}", message);
            }
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        if Self::should_use_color() {
            eprintln!("{} {}", console::style("✗").red(), message);
        } else {
            eprintln!("✗ {}", message);
        }
    }

    /// Check if output should be colored
    pub fn should_use_color() -> bool {
        atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
    }
}

/// Print one line per converted file
pub fn print_converted(report: &ConversionReport, quiet: bool) {
    for file in &report.converted {
        CliUtils::show_success(
            &format!("{} -> {}", file.source.display(), file.dest.display()),
            quiet,
        );
    }
}

/// Print human-readable run statistics
pub fn print_statistics(stats: &TreeStatistics) {
    println!("\nConversion Statistics:");
    println!("Files visited: {}", stats.files_visited);
    println!("Files written: {}", stats.files_written);
    println!("Files failed: {}", stats.files_failed);
    println!("Directories: {}", stats.directories);
    if stats.skipped > 0 {
        println!("Skipped (not regular files): {}", stats.skipped);
    }
    println!("Input size: {}", CliUtils::format_file_size(stats.bytes_read));
    println!("Output size: {}", CliUtils::format_file_size(stats.bytes_written));
    println!(
        "Processing time: {}",
        CliUtils::format_duration(stats.duration())
    );
    println!("Success rate: {:.1}%", stats.success_rate());
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &anyhow::Error) {
    let Some(error) = error.downcast_ref::<TreeError>() else {
        CliUtils::show_error(&format!("{:#}", error));
        return;
    };

    CliUtils::show_error(&error.user_message());

    // Provide helpful suggestions
    match error {
        TreeError::Configuration { .. } => {
            eprintln!("\nTry 'tplconv --help' for usage information.");
        }
        TreeError::Enumeration { .. } => {
            eprintln!("\nTip: SRC must be an existing, readable file or directory");
        }
        TreeError::PartialFailure { report } => {
            if report.errors.iter().any(|e| e.stage == Stage::Convert) {
                eprintln!("\nTip: Use --converter to choose the program that converts each file");
            }
        }
    }
}
