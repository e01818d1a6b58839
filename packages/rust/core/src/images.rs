//! Image tree import.
//!
//! Walks an image root depth-first and emits one non-indexed content record
//! per file whose detected MIME type is `image/*`. Other files are skipped.
//! Siblings are visited in file-name order so reruns produce identical
//! output.

use std::path::Path;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use basin_shared::{BasinError, ContentId, ContentRecord, ImageRecord, ImageVocab, Result};

/// Import every image file under `root`.
///
/// Identifiers are derived from each file's path under `root`; pass a
/// canonical root so they match references computed elsewhere.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn import_images(root: &Path) -> Result<Vec<ContentRecord>> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| BasinError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(mime) = detect_image_mime(path) else {
            debug!(path = %path.display(), "not an image, skipping");
            skipped += 1;
            continue;
        };

        records.push(ContentRecord::Image(ImageRecord {
            id: ContentId::derive(&path.to_string_lossy()),
            vocab: ImageVocab::default(),
            source: path.to_path_buf(),
            content_type: mime.to_string(),
            indexed: false,
        }));
    }

    info!(images = records.len(), skipped, "image import complete");
    Ok(records)
}

/// MIME type of `path` if it is an image.
pub fn detect_image_mime(path: &Path) -> Option<&'static str> {
    mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
}
