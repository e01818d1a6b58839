//! Shared types, error model, and configuration for basin-recipes.
//!
//! This crate is the foundation depended on by all other basin crates.
//! It provides:
//! - [`BasinError`]: the unified error type
//! - [`ContentId`]: content-addressed identifiers
//! - Manifest types ([`Manifest`], [`ContentRecord`], [`SetRecord`], [`StepDescriptor`])
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod id;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, LayoutConfig, ManifestConfig, config_dir, config_file_path,
    load_config, load_config_from,
};
pub use error::{BasinError, Result};
pub use id::{ContentId, ID_PREFIX};
pub use types::{
    ARTICLE_TAG, ArticleRecord, ArticleVocab, ContentRecord, HOME_PAGE_TAG, ImageRecord,
    ImageVocab, Manifest, ObjectType, SET_TAG, SetRecord, SetVocab, StepDescriptor,
};
