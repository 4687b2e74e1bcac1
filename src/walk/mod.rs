//! Source tree enumeration

use std::fs::{self, Permissions};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ConversionError, TreeError, TreeResult};

/// A filesystem node discovered under the source root
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub permissions: Permissions,
    pub len: u64,
}

/// Everything the walker saw, in walk order
#[derive(Debug, Default)]
pub struct SourceTree {
    pub entries: Vec<WalkEntry>,
    /// Entries the walker could not read
    pub errors: Vec<ConversionError>,
    /// Unfollowed symlinks and special files that were left out
    pub skipped: Vec<PathBuf>,
}

impl SourceTree {
    pub fn files(&self) -> impl Iterator<Item = &WalkEntry> {
        self.entries.iter().filter(|entry| !entry.is_dir)
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn dir_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_dir).count()
    }
}

/// Enumerate every entry at or under `root`, depth-first with entries sorted
/// by file name so the order is stable across runs.
///
/// Failing to read the root itself is fatal. Failures below the root are
/// recorded on the returned tree and the walk continues.
pub fn enumerate(root: &Path, follow_links: bool) -> TreeResult<SourceTree> {
    fs::metadata(root).map_err(|e| TreeError::enumeration(root, e))?;

    let mut tree = SourceTree::default();

    for entry in WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let path = e.path().unwrap_or(root).to_path_buf();
                return Err(TreeError::enumeration(path, e.into()));
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                tree.errors.push(ConversionError::walk(path, e));
                continue;
            }
        };

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                tree.errors
                    .push(ConversionError::walk(entry.path().to_path_buf(), e));
                continue;
            }
        };

        // Unfollowed symlinks and other special files are not converted
        if !metadata.is_dir() && !metadata.is_file() {
            if metadata.file_type().is_symlink() {
                tracing::warn!(
                    path = %entry.path().display(),
                    "skipping symlink, use --follow-links to convert its target"
                );
            } else {
                tracing::warn!(path = %entry.path().display(), "skipping non-regular file");
            }
            tree.skipped.push(entry.into_path());
            continue;
        }

        tree.entries.push(WalkEntry {
            path: entry.into_path(),
            is_dir: metadata.is_dir(),
            permissions: metadata.permissions(),
            len: metadata.len(),
        });
    }

    Ok(tree)
}
