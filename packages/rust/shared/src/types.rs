//! Manifest data model.
//!
//! The manifest is a flat JSON graph: `content` holds articles and images,
//! `sets` holds browsable groupings. Sets reference their members by tag
//! string (`childTags`), never by identifier.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::id::ContentId;

/// Tag carried by every article record.
pub const ARTICLE_TAG: &str = "EknArticleObject";
/// Tag carried by every set record.
pub const SET_TAG: &str = "EknSetObject";
/// Marks sets shown on the home page.
pub const HOME_PAGE_TAG: &str = "EknHomePageTag";

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Logical record kind, independent of the wire vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Article,
    Image,
    Set,
}

// Each record carries its own single-valued `@type` so a record can never be
// serialized under the wrong vocabulary term.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleVocab {
    #[default]
    #[serde(rename = "ekn://_vocab/ArticleObject")]
    ArticleObject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageVocab {
    #[default]
    #[serde(rename = "ekn://_vocab/ImageObject")]
    ImageObject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetVocab {
    #[default]
    #[serde(rename = "ekn://_vocab/SetObject")]
    SetObject,
}

// ---------------------------------------------------------------------------
// StepDescriptor
// ---------------------------------------------------------------------------

/// One navigable step in an article's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Zero-based step index.
    #[serde(rename = "@id")]
    pub id: usize,
    /// Human label, 1-based (`Step 1`).
    #[serde(rename = "hasLabel")]
    pub label: String,
    /// String form of the zero-based index.
    #[serde(rename = "hasIndexLabel")]
    pub index_label: String,
    #[serde(rename = "hasIndex")]
    pub index: usize,
    /// Anchor into the article HTML (`#Step0`).
    #[serde(rename = "hasContent")]
    pub content: String,
}

// ---------------------------------------------------------------------------
// Content records
// ---------------------------------------------------------------------------

/// A recipe article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    #[serde(rename = "@id")]
    pub id: ContentId,
    #[serde(rename = "@type", default)]
    pub vocab: ArticleVocab,
    pub content_type: String,
    pub tags: Vec<String>,
    pub indexed: bool,
    /// Path of the generated HTML body.
    pub source: PathBuf,
    pub table_of_contents: Vec<StepDescriptor>,
    pub title: String,
    pub synopsis: String,
    pub source_name: String,
    /// Identifier of an image record in the same manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ContentId>,
}

/// An image file found under one of the image roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    #[serde(rename = "@id")]
    pub id: ContentId,
    #[serde(rename = "@type", default)]
    pub vocab: ImageVocab,
    pub source: PathBuf,
    pub content_type: String,
    pub indexed: bool,
}

/// A single indexable unit in the manifest.
///
/// Serializes flat, without an enum wrapper; the variant is recoverable
/// from `@type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentRecord {
    Article(ArticleRecord),
    Image(ImageRecord),
}

impl ContentRecord {
    pub fn id(&self) -> &ContentId {
        match self {
            Self::Article(article) => &article.id,
            Self::Image(image) => &image.id,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Article(_) => ObjectType::Article,
            Self::Image(_) => ObjectType::Image,
        }
    }

    /// Classification tags. Images carry none.
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Article(article) => &article.tags,
            Self::Image(_) => &[],
        }
    }

    pub fn thumbnail(&self) -> Option<&ContentId> {
        match self {
            Self::Article(article) => article.thumbnail.as_ref(),
            Self::Image(_) => None,
        }
    }

    pub fn as_article(&self) -> Option<&ArticleRecord> {
        match self {
            Self::Article(article) => Some(article),
            Self::Image(_) => None,
        }
    }
}

impl From<ArticleRecord> for ContentRecord {
    fn from(article: ArticleRecord) -> Self {
        Self::Article(article)
    }
}

impl From<ImageRecord> for ContentRecord {
    fn from(image: ImageRecord) -> Self {
        Self::Image(image)
    }
}

// ---------------------------------------------------------------------------
// SetRecord
// ---------------------------------------------------------------------------

/// A named grouping (category or chef) used for browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    #[serde(rename = "@id")]
    pub id: ContentId,
    #[serde(rename = "@type", default)]
    pub vocab: SetVocab,
    pub tags: Vec<String>,
    /// Members are the records whose `tags` contain this value.
    pub child_tags: Vec<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ContentId>,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Root of the generated graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub content: Vec<ContentRecord>,
    pub sets: Vec<SetRecord>,
}

impl Manifest {
    /// Look up a content record by identifier.
    pub fn content_by_id(&self, id: &ContentId) -> Option<&ContentRecord> {
        self.content.iter().find(|record| record.id() == id)
    }

    pub fn articles(&self) -> impl Iterator<Item = &ArticleRecord> {
        self.content.iter().filter_map(ContentRecord::as_article)
    }
}
