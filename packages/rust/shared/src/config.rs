//! Application configuration for basin-recipes.
//!
//! User config lives at `~/.basin-recipes/basin-recipes.toml`.
//! An explicit `--config` file overrides it, and every field has a default,
//! so running without any config file is the common case.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BasinError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "basin-recipes.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".basin-recipes";

// ---------------------------------------------------------------------------
// Config structs (matching basin-recipes.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where inputs live under the data directory.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Values written into the manifest.
    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// `[layout]` section. All paths are relative to the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    #[serde(default = "default_recipes_db")]
    pub recipes_db: PathBuf,

    #[serde(default = "default_chefs_db")]
    pub chefs_db: PathBuf,

    /// Recipe images, one sub-directory per recipe section.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Chef thumbnails, one sub-directory per chef section.
    #[serde(default = "default_thumbnails_dir")]
    pub thumbnails_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            recipes_db: default_recipes_db(),
            chefs_db: default_chefs_db(),
            images_dir: default_images_dir(),
            thumbnails_dir: default_thumbnails_dir(),
        }
    }
}

fn default_recipes_db() -> PathBuf {
    PathBuf::from("data").join("recipes.db")
}
fn default_chefs_db() -> PathBuf {
    PathBuf::from("data").join("chefs.db")
}
fn default_images_dir() -> PathBuf {
    "images".into()
}
fn default_thumbnails_dir() -> PathBuf {
    "thumbnails".into()
}

/// `[manifest]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestConfig {
    /// `sourceName` written on every article.
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Display height (px) of images embedded in step markup.
    #[serde(default = "default_image_height")]
    pub image_height: u32,

    /// Category that every chef set is tagged with.
    #[serde(default = "default_chefs_category")]
    pub chefs_category: String,

    /// Fail the run on dangling references instead of only logging them.
    #[serde(default)]
    pub strict_references: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            image_height: default_image_height(),
            chefs_category: default_chefs_category(),
            strict_references: false,
        }
    }
}

fn default_source_name() -> String {
    "wikipedia".into()
}
fn default_image_height() -> u32 {
    400
}
fn default_chefs_category() -> String {
    "Chefs".into()
}

// ---------------------------------------------------------------------------
// Build config (runtime, merged from config + CLI arguments)
// ---------------------------------------------------------------------------

/// Runtime configuration for one manifest build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Canonical data directory.
    pub data_dir: PathBuf,
    /// Where the manifest is written.
    pub manifest_path: PathBuf,
    pub layout: LayoutConfig,
    pub manifest: ManifestConfig,
}

impl BuildConfig {
    /// Merge file config with the CLI arguments.
    ///
    /// The data directory is canonicalized so every path-derived identifier
    /// is hashed from the same absolute spelling.
    pub fn new(app: &AppConfig, data_dir: &Path, manifest_path: impl Into<PathBuf>) -> Result<Self> {
        let data_dir =
            std::fs::canonicalize(data_dir).map_err(|e| BasinError::io(data_dir, e))?;
        Ok(Self {
            data_dir,
            manifest_path: manifest_path.into(),
            layout: app.layout.clone(),
            manifest: app.manifest.clone(),
        })
    }

    pub fn recipes_db(&self) -> PathBuf {
        self.data_dir.join(&self.layout.recipes_db)
    }

    pub fn chefs_db(&self) -> PathBuf {
        self.data_dir.join(&self.layout.chefs_db)
    }

    pub fn images_root(&self) -> PathBuf {
        self.data_dir.join(&self.layout.images_dir)
    }

    pub fn thumbnails_root(&self) -> PathBuf {
        self.data_dir.join(&self.layout.thumbnails_dir)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.basin-recipes/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| BasinError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.basin-recipes/basin-recipes.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the user config. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = match config_file_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BasinError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BasinError::config(format!("failed to parse {}: {e}", path.display())))
}
