use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// Where raw documents come from.
///
/// `list` failing means nothing can be served; `read` failing only loses the
/// one document.
pub trait ContentSource {
    /// Names of every document in the collection, in build order.
    fn list(&self) -> Result<Vec<String>>;

    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// Flat directory of markdown files. Subdirectories are not visited.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    extension: String,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf(), extension: "md".to_string() }
    }

    /// Only list files with this extension (compared case-insensitively).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path { &self.root }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

impl ContentSource for DirSource {
    fn list(&self) -> Result<Vec<String>> {
        let enumeration_error = |source: std::io::Error| Error::SourceEnumeration { path: self.root.clone(), source };

        // WalkDir reports a missing root lazily, as the first entry.
        let meta = fs::metadata(&self.root).map_err(enumeration_error)?;
        if !meta.is_dir() {
            return Err(enumeration_error(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "not a directory",
            )));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(e) => e,
                // Depth 0 is the root itself: nothing below it can be listed.
                Err(err) if err.depth() == 0 => return Err(enumeration_error(std::io::Error::from(err))),
                Err(err) => {
                    tracing::warn!(root = %self.root.display(), error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let p = entry.path();
            if !entry.file_type().is_file() || !self.matches_extension(p) {
                continue;
            }
            match p.file_name().and_then(|s| s.to_str()) {
                Some(name) => names.push(name.to_string()),
                None => {
                    tracing::warn!(path = %p.to_string_lossy(), "skipping document with non UTF-8 file name");
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        fs::read(self.root.join(name)).map_err(|source| Error::SourceRead { name: name.to_string(), source })
    }
}

/// Documents held in memory, listed in name order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(name.into(), content.into());
        self
    }
}

impl<N: Into<String>, C: Into<Vec<u8>>> FromIterator<(N, C)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        let files = iter.into_iter().map(|(n, c)| (n.into(), c.into())).collect();
        Self { files }
    }
}

impl ContentSource for MemorySource {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.files.get(name).cloned().ok_or_else(|| Error::SourceRead {
            name: name.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
        })
    }
}
