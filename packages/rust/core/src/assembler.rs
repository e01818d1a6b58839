//! Manifest assembler.
//!
//! Concatenates the imported record streams into one [`Manifest`] in a fixed
//! order, checks that every reference in it resolves, and writes it to disk
//! as tab-indented JSON.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use basin_shared::{BasinError, ContentId, ContentRecord, Manifest, ObjectType, Result, SetRecord};

/// Record streams produced by the import phases.
#[derive(Debug, Clone, Default)]
pub struct ManifestParts {
    pub articles: Vec<ContentRecord>,
    pub category_sets: Vec<SetRecord>,
    pub chef_sets: Vec<SetRecord>,
    /// Records from the images root.
    pub images: Vec<ContentRecord>,
    /// Records from the thumbnails root.
    pub thumbnails: Vec<ContentRecord>,
}

/// Assemble the manifest.
///
/// `content` is articles, then images, then thumbnails; `sets` is category
/// sets, then chef sets. Nothing is dropped, reordered within a stream, or
/// duplicated.
#[instrument(skip_all)]
pub fn assemble_manifest(parts: ManifestParts) -> Manifest {
    let ManifestParts {
        articles,
        category_sets,
        chef_sets,
        images,
        thumbnails,
    } = parts;

    let mut content = articles;
    content.extend(images);
    content.extend(thumbnails);

    let mut sets = category_sets;
    sets.extend(chef_sets);

    debug!(content = content.len(), sets = sets.len(), "manifest assembled");
    Manifest { content, sets }
}

// ---------------------------------------------------------------------------
// Reference checking
// ---------------------------------------------------------------------------

/// A reference in the manifest that does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    /// `thumbnail` does not name an image record in `content`.
    Thumbnail { owner: ContentId, target: ContentId },
    /// No content record or set carries the set's child tag.
    ChildTag { set: ContentId, tag: String },
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Thumbnail { owner, target } => {
                write!(f, "{owner}: thumbnail {target} is not an image in the manifest")
            }
            Self::ChildTag { set, tag } => {
                write!(f, "{set}: no record is tagged `{tag}`")
            }
        }
    }
}

/// Find every thumbnail and set membership that does not resolve.
#[instrument(skip_all, fields(content = manifest.content.len(), sets = manifest.sets.len()))]
pub fn check_references(manifest: &Manifest) -> Vec<DanglingReference> {
    let images: HashSet<&ContentId> = manifest
        .content
        .iter()
        .filter(|record| record.object_type() == ObjectType::Image)
        .map(ContentRecord::id)
        .collect();

    let tags: HashSet<&str> = manifest
        .content
        .iter()
        .flat_map(ContentRecord::tags)
        .chain(manifest.sets.iter().flat_map(|set| &set.tags))
        .map(String::as_str)
        .collect();

    let mut dangling = Vec::new();

    let content_thumbs = manifest
        .content
        .iter()
        .filter_map(|record| Some((record.id(), record.thumbnail()?)));
    let set_thumbs = manifest
        .sets
        .iter()
        .filter_map(|set| Some((&set.id, set.thumbnail.as_ref()?)));

    for (owner, target) in content_thumbs.chain(set_thumbs) {
        if !images.contains(target) {
            dangling.push(DanglingReference::Thumbnail {
                owner: owner.clone(),
                target: target.clone(),
            });
        }
    }

    for set in &manifest.sets {
        for tag in &set.child_tags {
            if !tags.contains(tag.as_str()) {
                dangling.push(DanglingReference::ChildTag {
                    set: set.id.clone(),
                    tag: tag.clone(),
                });
            }
        }
    }

    debug!(dangling = dangling.len(), "reference check complete");
    dangling
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Serialize the manifest as tab-indented JSON.
pub fn manifest_json(manifest: &Manifest) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    manifest
        .serialize(&mut serializer)
        .map_err(|e| BasinError::validation(format!("JSON serialization failed: {e}")))?;
    Ok(buf)
}

/// Write the manifest to `path`.
///
/// The JSON is written to a sibling temp file first and renamed into place,
/// so an existing manifest is never left half-written.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let json = manifest_json(manifest)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| BasinError::io(parent, e))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| BasinError::validation(format!("not a file path: {}", path.display())))?;
    let temp = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

    std::fs::write(&temp, &json).map_err(|e| BasinError::io(&temp, e))?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(BasinError::io(path, e));
    }

    info!(bytes = json.len(), "manifest written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
