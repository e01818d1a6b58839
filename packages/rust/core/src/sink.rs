//! Destinations for generated article bodies.
//!
//! Each article's HTML is written once to its own file and the file path
//! becomes the record's `source`. Nothing reads these files back.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use basin_shared::{BasinError, ContentId, Result};

/// Writes an article body and returns the path it was written to.
pub trait ArticleSink {
    fn write_article(&mut self, id: &ContentId, html: &str) -> Result<PathBuf>;
}

// ---------------------------------------------------------------------------
// TempFileSink
// ---------------------------------------------------------------------------

/// Persists every body to a fresh `data_XXXXXX.html` temporary file.
///
/// Paths change on every run.
#[derive(Debug, Clone, Default)]
pub struct TempFileSink {
    dir: Option<PathBuf>,
}

impl TempFileSink {
    /// Use the system temporary directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the temporary files under `dir` instead.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }
}

impl ArticleSink for TempFileSink {
    fn write_article(&mut self, id: &ContentId, html: &str) -> Result<PathBuf> {
        let dir = self.dir.clone().unwrap_or_else(std::env::temp_dir);

        let mut file = tempfile::Builder::new()
            .prefix("data_")
            .suffix(".html")
            .rand_bytes(6)
            .tempfile_in(&dir)
            .map_err(|e| BasinError::io(&dir, e))?;

        file.write_all(html.as_bytes())
            .map_err(|e| BasinError::io(file.path(), e))?;

        let (_file, path) = file.keep().map_err(|e| BasinError::io(&dir, e.error))?;
        debug!(%id, path = %path.display(), "wrote article body");
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// DirectorySink
// ---------------------------------------------------------------------------

/// Writes `<dir>/<hash>.html`, named after the article identifier.
///
/// Paths are stable across runs, so a rebuild of unchanged input yields a
/// byte-identical manifest.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create (if needed) and canonicalize the output directory.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| BasinError::io(dir, e))?;
        let dir = std::fs::canonicalize(dir).map_err(|e| BasinError::io(dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArticleSink for DirectorySink {
    fn write_article(&mut self, id: &ContentId, html: &str) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.html", id.hash()));
        std::fs::write(&path, html).map_err(|e| BasinError::io(&path, e))?;
        debug!(%id, path = %path.display(), "wrote article body");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_file_sink_writes_distinct_files() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = TempFileSink::in_dir(tmp.path());
        let id = ContentId::derive("Cake");

        let first = sink.write_article(&id, "<p>one</p>").unwrap();
        let second = sink.write_article(&id, "<p>two</p>").unwrap();

        assert_ne!(first, second);
        let name = first.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("data_") && name.ends_with(".html"));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "<p>one</p>");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "<p>two</p>");
    }

    #[test]
    fn directory_sink_paths_are_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("articles");
        let id = ContentId::derive("Cake");

        let mut sink = DirectorySink::new(&out).unwrap();
        let first = sink.write_article(&id, "<p>x</p>").unwrap();
        let second = sink.write_article(&id, "<p>x</p>").unwrap();

        assert_eq!(first, second);
        assert!(first.is_absolute());
        assert_eq!(
            first.file_name().unwrap().to_string_lossy(),
            format!("{}.html", id.hash())
        );
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "<p>x</p>");
    }
}
