use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::CreativeResult;

/// Destination for finished export artifacts.
///
/// Ordering contract: `deliver` is called once per format, in batch order, after that format's
/// encode settled.
pub trait ArtifactSink {
    /// Hand over one named artifact.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> CreativeResult<()>;
}

/// In-memory sink for tests and hosts that upload artifacts themselves.
#[derive(Debug, Default)]
pub struct InMemoryArtifacts {
    artifacts: Vec<(String, Vec<u8>)>,
}

impl InMemoryArtifacts {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered artifacts in delivery order.
    pub fn artifacts(&self) -> &[(String, Vec<u8>)] {
        &self.artifacts
    }

    /// Delivered file names in delivery order.
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Bytes of the artifact called `file_name`.
    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.artifacts
            .iter()
            .find(|(n, _)| n == file_name)
            .map(|(_, b)| b.as_slice())
    }
}

impl ArtifactSink for InMemoryArtifacts {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> CreativeResult<()> {
        self.artifacts.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Writes artifacts into a directory, creating it on first delivery.
#[derive(Debug)]
pub struct DirArtifacts {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirArtifacts {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirArtifacts {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> CreativeResult<()> {
        let path = self.dir.join(file_name);
        ensure_parent_dir(&path)?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("write artifact '{}'", path.display()))?;
        self.written.push(path);
        Ok(())
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> CreativeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
