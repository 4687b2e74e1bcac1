//! Tree conversion engine
//!
//! Enumerates the source tree, then folds every regular file through the
//! map → mkdir → convert → write pipeline into a [`ConversionReport`]. A
//! failing file is recorded and the fold moves on; only an unreadable source
//! root stops a run.

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::conversion::config::TreeConfig;
use crate::conversion::converter::Converter;
use crate::conversion::stats::TreeStatistics;
use crate::error::{ConversionError, ErrorRecord, FileResult, TreeError, TreeResult};
use crate::mapping::PathMapper;
use crate::walk::{self, SourceTree, WalkEntry};

/// A file that made it through the whole pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Outcome of one conversion run
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Files written, in walk order
    pub converted: Vec<ConvertedFile>,
    /// Per-file failures, in walk order
    pub errors: Vec<ConversionError>,
    pub stats: TreeStatistics,
}

impl ConversionReport {
    fn from_walk(tree: &SourceTree, errors: Vec<ConversionError>) -> Self {
        let mut report = Self::default();
        report.stats.directories = tree.dir_count();
        report.stats.skipped = tree.skipped.len();
        // An entry the walker could not read counts as a failed file
        for _ in &errors {
            report.stats.record_failed(0);
        }
        report.errors = errors;
        report
    }

    /// Fold one file's outcome into the report
    pub fn absorb(mut self, entry: &WalkEntry, outcome: FileResult<ConvertedFile>) -> Self {
        match outcome {
            Ok(file) => {
                self.stats.record_written(file.bytes_read, file.bytes_written);
                self.converted.push(file);
            }
            Err(error) => {
                self.stats.record_failed(entry.len);
                self.errors.push(error);
            }
        }
        self
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Serializable summary for machine-readable output
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            success: self.is_success(),
            converted: self.converted.clone(),
            errors: self.errors.iter().map(ErrorRecord::from).collect(),
            statistics: self.stats.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub success: bool,
    pub converted: Vec<ConvertedFile>,
    pub errors: Vec<ErrorRecord>,
    pub statistics: TreeStatistics,
}

/// Drives conversion runs with one configuration and converter
pub struct TreeConverter<'c, C: Converter + ?Sized> {
    config: TreeConfig,
    converter: &'c C,
    progress: Option<ProgressBar>,
}

impl<'c, C: Converter + ?Sized> TreeConverter<'c, C> {
    pub fn new(config: TreeConfig, converter: &'c C) -> Self {
        Self {
            config,
            converter,
            progress: None,
        }
    }

    /// Report per-file progress on the given bar; its length is set once the
    /// source tree has been enumerated.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Convert the tree and fail with [`TreeError::PartialFailure`] if any
    /// file failed.
    pub fn run(&self, source_root: &Path, dest_root: &Path) -> TreeResult<ConversionReport> {
        let report = self.mirror(source_root, dest_root)?;
        if report.is_success() {
            Ok(report)
        } else {
            Err(TreeError::PartialFailure {
                report: Box::new(report),
            })
        }
    }

    /// Convert the tree and return the report whatever the per-file outcome.
    pub fn mirror(&self, source_root: &Path, dest_root: &Path) -> TreeResult<ConversionReport> {
        let start_time = Instant::now();

        if source_root.as_os_str().is_empty() {
            return Err(TreeError::configuration("source path must not be empty"));
        }
        if dest_root.as_os_str().is_empty() {
            return Err(TreeError::configuration("destination path must not be empty"));
        }
        self.config.validate().map_err(TreeError::configuration)?;

        let mapper = PathMapper::new(source_root, dest_root)
            .with_extension(self.config.extension.clone());
        info!(
            source = %source_root.display(),
            dest = %dest_root.display(),
            "converting tree"
        );
        debug!(base_path = mapper.base_path(), "computed base path");

        let mut tree = walk::enumerate(source_root, self.config.follow_links)?;
        let errors = std::mem::take(&mut tree.errors);
        for error in &errors {
            warn!(path = %error.path.display(), error = %error.source, "cannot read entry");
        }

        let report = ConversionReport::from_walk(&tree, errors);
        let files: Vec<&WalkEntry> = tree.files().collect();
        debug!(
            files = files.len(),
            directories = report.stats.directories,
            skipped = report.stats.skipped,
            "enumerated source tree"
        );

        // Destinations are claimed in walk order before anything is written
        let planned: Vec<(&WalkEntry, FileResult<PathBuf>)> = files
            .iter()
            .copied()
            .zip(mapper.map_all(files.iter().map(|entry| entry.path.as_path())))
            .collect();

        if let Some(progress) = &self.progress {
            progress.set_length(planned.len() as u64);
        }

        let mut report = if self.config.parallel {
            let outcomes: Vec<_> = planned
                .into_par_iter()
                .map(|(entry, dest)| (entry, self.step(entry, dest)))
                .collect();
            outcomes
                .into_iter()
                .fold(report, |report, (entry, outcome)| report.absorb(entry, outcome))
        } else {
            planned.into_iter().fold(report, |report, (entry, dest)| {
                report.absorb(entry, self.step(entry, dest))
            })
        };

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        report.stats.finish(start_time.elapsed());
        info!(
            written = report.stats.files_written,
            failed = report.error_count(),
            "tree conversion finished"
        );

        Ok(report)
    }

    fn step(&self, entry: &WalkEntry, dest: FileResult<PathBuf>) -> FileResult<ConvertedFile> {
        let outcome = dest.and_then(|dest| self.convert_file(entry, dest));

        match &outcome {
            Ok(file) => debug!(
                source = %file.source.display(),
                dest = %file.dest.display(),
                "converted"
            ),
            Err(error) => warn!(
                path = %error.path.display(),
                stage = %error.stage,
                error = %format!("{:#}", error.source),
                "conversion failed"
            ),
        }

        if let Some(progress) = &self.progress {
            progress.inc(1);
        }

        outcome
    }

    fn convert_file(&self, entry: &WalkEntry, dest: PathBuf) -> FileResult<ConvertedFile> {
        let source = &entry.path;

        if let Some(dir) = dest.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_dest_dir(dir, self.config.dir_mode).map_err(|e| {
                ConversionError::mkdir(
                    source,
                    anyhow::Error::new(e).context(format!("creating {}", dir.display())),
                )
            })?;
        }

        let bytes = self
            .converter
            .convert(source, &self.config.converter)
            .map_err(|e| ConversionError::convert(source, e))?;

        write_output(&dest, &bytes, &entry.permissions).map_err(|e| {
            ConversionError::write(
                source,
                anyhow::Error::new(e).context(format!("writing {}", dest.display())),
            )
        })?;

        Ok(ConvertedFile {
            source: source.clone(),
            dest,
            bytes_read: entry.len,
            bytes_written: bytes.len() as u64,
        })
    }
}

/// Convert every file under `source_root` into the mirrored path under
/// `dest_root`.
pub fn convert_tree<C: Converter + ?Sized>(
    source_root: &Path,
    dest_root: &Path,
    config: &TreeConfig,
    converter: &C,
) -> TreeResult<ConversionReport> {
    TreeConverter::new(config.clone(), converter).run(source_root, dest_root)
}

/// Create `dir` and any missing ancestors. An existing directory is not an
/// error, including one created concurrently by another worker.
fn create_dest_dir(dir: &Path, mode: u32) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(dir)
}

/// Write `bytes` to a temporary file beside `path`, give it the source
/// permissions, then rename it into place. Renaming replaces an existing
/// output even when a previous run left it read-only.
fn write_output(path: &Path, bytes: &[u8], permissions: &Permissions) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".tplconv-")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    fs::set_permissions(tmp.path(), permissions.clone())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
