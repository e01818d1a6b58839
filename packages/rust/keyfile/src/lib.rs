//! Section-based key/value database reader.
//!
//! Both the recipe and chef databases are key files: named `[sections]`
//! holding `key=value` entries. Section names are stable entry keys, and
//! section order is the order entries are imported in.

mod parser;

use std::path::{Path, PathBuf};

use basin_shared::{BasinError, Result};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// KeyFile
// ---------------------------------------------------------------------------

/// A parsed key file.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
    sections: Vec<Section>,
}

impl KeyFile {
    /// Read and parse the key file at `path`.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BasinError::io(path, e))?;
        let key_file = Self::parse(&content, path)?;
        debug!(sections = key_file.sections.len(), "key file loaded");
        Ok(key_file)
    }

    /// Parse key file text. `origin` is used to label errors.
    pub fn parse(content: &str, origin: impl Into<PathBuf>) -> Result<Self> {
        let path = origin.into();
        let sections = parser::parse_sections(content, &path)?;
        Ok(Self { path, sections })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sections in first-appearance order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// One named section and its entries, in insertion order.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    origin: PathBuf,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str, origin: &Path) -> Self {
        Self {
            name: name.to_string(),
            origin: origin.to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Insert or replace an entry.
    fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Raw value for a required `key`; absence names the file, section and key.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| BasinError::missing_field(&self.origin, &self.name, key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_recipes_fixture() {
        let key_file = KeyFile::load(Path::new("../../../fixtures/db/recipes.db")).unwrap();
        let names: Vec<_> = key_file.sections().map(Section::name).collect();
        assert_eq!(names, ["Metadata", "Cake", "Bread", "Brownies"]);

        let cake = key_file.section("Cake").unwrap();
        assert_eq!(cake.get("Images"), Some("cake1.jpg;cake2.jpg"));
        assert_eq!(cake.get("DefaultImage"), Some("1"));
    }

    #[test]
    fn require_reports_missing_key() {
        let key_file = KeyFile::parse("[Cake]\nName=Cake\n", "recipes.db").unwrap();
        let cake = key_file.section("Cake").unwrap();

        assert_eq!(cake.require("Name").unwrap(), "Cake");
        let err = cake.require("Author").unwrap_err();
        match err {
            BasinError::MissingField { path, group, key } => {
                assert_eq!(path, PathBuf::from("recipes.db"));
                assert_eq!(group, "Cake");
                assert_eq!(key, "Author");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn locale_suffixed_keys_are_distinct() {
        let key_file = KeyFile::parse("[Cake]\nName=Cake\nName[fr]=Gâteau\n", "r.db").unwrap();
        let cake = key_file.section("Cake").unwrap();
        assert_eq!(cake.get("Name"), Some("Cake"));
        assert_eq!(cake.get("Name[fr]"), Some("Gâteau"));
        assert_eq!(cake.keys().count(), 2);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeyFile::load(&dir.path().join("absent.db")).unwrap_err();
        assert!(matches!(err, BasinError::Io { .. }));
    }

    #[test]
    fn empty_file_has_no_sections() {
        let key_file = KeyFile::parse("", "chefs.db").unwrap();
        assert!(key_file.is_empty());
        assert_eq!(key_file.path(), Path::new("chefs.db"));
    }
}
