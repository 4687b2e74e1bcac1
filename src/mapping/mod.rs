//! Source-to-destination path mapping
//!
//! Two strategies live here. [`compute_base_path`] and [`map_path`] rewrite a
//! path by replacing the first occurrence of a common base path; this is kept
//! because callers rely on the base path for diagnostics, but it silently
//! leaves a path unchanged when the base is not a substring of it.
//! [`PathMapper::map`] derives each file's path relative to the source root
//! and joins it onto the destination root, which is what the tree converter
//! uses.

use std::collections::HashMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use crate::error::{ConversionError, FileResult};

/// What happens to a file's extension when it lands in the destination tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtensionPolicy {
    /// Keep the source file name as-is
    #[default]
    Keep,
    /// Replace the extension with the given one (leading dot optional)
    Force(String),
}

impl ExtensionPolicy {
    pub fn from_option(extension: Option<String>) -> Self {
        match extension {
            Some(ext) => Self::Force(ext),
            None => Self::Keep,
        }
    }

    /// Apply the policy to a destination file path
    pub fn apply(&self, mut path: PathBuf) -> PathBuf {
        if let Self::Force(ext) = self {
            path.set_extension(ext.trim_start_matches('.'));
        }
        path
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split(MAIN_SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Compute the pivot path shared by `source_root` and `dest_root`.
///
/// Segments of the source root are accumulated while they equal the
/// destination segment at the same index. The first segment that differs, or
/// that has no counterpart because the destination ran out, is still kept and
/// ends the scan. Empty segments (repeated or trailing separators) are ignored.
/// The result is prefixed with a separator iff `source_root` is absolute.
///
/// ```
/// use tplconv::mapping::compute_base_path;
///
/// assert_eq!(compute_base_path("/a/b/src", "/a/b/dest"), "/a/b/src");
/// assert_eq!(compute_base_path("/a/b/c", "/a"), "/a/b");
/// ```
pub fn compute_base_path(source_root: &str, dest_root: &str) -> String {
    let source = segments(source_root);
    let dest = segments(dest_root);

    let mut base = Vec::with_capacity(source.len());
    for (index, segment) in source.iter().enumerate() {
        base.push(*segment);
        match dest.get(index) {
            Some(other) if other == segment => continue,
            _ => break,
        }
    }

    let joined = base.join(MAIN_SEPARATOR_STR);
    if source_root.starts_with(MAIN_SEPARATOR) {
        format!("{}{}", MAIN_SEPARATOR, joined)
    } else {
        joined
    }
}

/// Replace the first occurrence of `base_path` in `path` with `dest_root`.
///
/// Returns `path` unchanged when `base_path` does not occur in it.
pub fn map_path(path: &str, base_path: &str, dest_root: &str) -> String {
    path.replacen(base_path, dest_root, 1)
}

/// Maps files discovered under a source root to their destination paths
#[derive(Debug, Clone)]
pub struct PathMapper {
    source_root: PathBuf,
    dest_root: PathBuf,
    base_path: String,
    extension: ExtensionPolicy,
}

impl PathMapper {
    pub fn new(source_root: impl AsRef<Path>, dest_root: impl AsRef<Path>) -> Self {
        let source_root = source_root.as_ref().to_path_buf();
        let dest_root = dest_root.as_ref().to_path_buf();
        let base_path = compute_base_path(
            &source_root.to_string_lossy(),
            &dest_root.to_string_lossy(),
        );

        Self {
            source_root,
            dest_root,
            base_path,
            extension: ExtensionPolicy::Keep,
        }
    }

    pub fn with_extension(mut self, extension: ExtensionPolicy) -> Self {
        self.extension = extension;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Map a file found under the source root into the destination tree.
    ///
    /// A source root that is itself a file maps onto the destination root
    /// verbatim, without applying the extension policy.
    pub fn map(&self, path: &Path) -> FileResult<PathBuf> {
        let relative = path.strip_prefix(&self.source_root).map_err(|_| {
            ConversionError::mapping(
                path,
                anyhow::anyhow!(
                    "path is not under source root {}",
                    self.source_root.display()
                ),
            )
        })?;

        if relative.as_os_str().is_empty() {
            return Ok(self.dest_root.clone());
        }

        Ok(self.extension.apply(self.dest_root.join(relative)))
    }

    /// Map a sequence of files, in order. A file whose destination was already
    /// claimed by an earlier file is a mapping error naming that file, so a
    /// forced extension can never make two sources share one output.
    pub fn map_all<'a, I>(&self, paths: I) -> Vec<FileResult<PathBuf>>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();

        paths
            .into_iter()
            .map(|path| {
                let dest = self.map(path)?;
                if let Some(first) = claimed.get(&dest) {
                    return Err(ConversionError::mapping(
                        path,
                        anyhow::anyhow!(
                            "destination {} is already produced from {}",
                            dest.display(),
                            first.display()
                        ),
                    ));
                }
                claimed.insert(dest.clone(), path);
                Ok(dest)
            })
            .collect()
    }
}
