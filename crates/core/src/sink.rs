//! Output sinks for generated artifacts.
//!
//! A sink hands out one writer per fully-qualified artifact name and refuses
//! to create the same name twice.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{GenerateError, Result};

/// Destination for generated source files.
pub trait ArtifactSink {
    /// Open a new artifact for writing. Fails with
    /// [`GenerateError::ArtifactWriteFailure`] if `qualified_name` was
    /// already created by this sink or cannot be opened.
    fn create(&mut self, qualified_name: &str) -> Result<Box<dyn Write + '_>>;
}

fn already_exists(qualified_name: &str) -> GenerateError {
    GenerateError::write_failure(
        qualified_name,
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "artifact was already created in this round",
        ),
    )
}

/// Path of the `.java` file for `qualified_name` under `out_dir`.
pub fn artifact_path(out_dir: &Path, qualified_name: &str) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    let mut segments = qualified_name.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_some() {
            path.push(segment);
        } else {
            path.push(format!("{segment}.java"));
        }
    }
    path
}

// =============================================================================
// Filesystem
// =============================================================================

/// Writes artifacts as source files below an output directory, one
/// directory per package segment. Existing files are overwritten.
#[derive(Debug)]
pub struct FsSink {
    out_dir: PathBuf,
    created: HashSet<String>,
    written: Vec<PathBuf>,
}

impl FsSink {
    /// Sink rooted at `out_dir`. The directory is created on first write.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            created: HashSet::new(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Files created so far, in creation order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for FsSink {
    fn create(&mut self, qualified_name: &str) -> Result<Box<dyn Write + '_>> {
        if !self.created.insert(qualified_name.to_string()) {
            return Err(already_exists(qualified_name));
        }

        let path = artifact_path(&self.out_dir, qualified_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| GenerateError::write_failure(qualified_name, e))?;
        }
        let file =
            File::create(&path).map_err(|e| GenerateError::write_failure(qualified_name, e))?;
        self.written.push(path);
        Ok(Box::new(BufWriter::new(file)))
    }
}

// =============================================================================
// Memory
// =============================================================================

/// Keeps artifacts in memory, ordered by name.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source of an artifact, if it was created and is valid UTF-8.
    pub fn get(&self, qualified_name: &str) -> Option<&str> {
        self.artifacts
            .get(qualified_name)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Names of all created artifacts, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Number of created artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// True when nothing has been created.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// All artifacts as text, keyed by qualified name.
    pub fn into_artifacts(self) -> BTreeMap<String, String> {
        self.artifacts
            .into_iter()
            .map(|(name, bytes)| (name, String::from_utf8_lossy(&bytes).into_owned()))
            .collect()
    }
}

impl ArtifactSink for MemorySink {
    fn create(&mut self, qualified_name: &str) -> Result<Box<dyn Write + '_>> {
        if self.artifacts.contains_key(qualified_name) {
            return Err(already_exists(qualified_name));
        }
        let buffer = self.artifacts.entry(qualified_name.to_string()).or_default();
        Ok(Box::new(buffer))
    }
}
