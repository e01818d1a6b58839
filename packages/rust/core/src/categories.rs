//! Category sets.
//!
//! Every distinct category seen during recipe import becomes a home page
//! set whose members are the articles tagged with the category name.

use tracing::{debug, instrument};

use basin_shared::{ContentId, HOME_PAGE_TAG, SET_TAG, SetRecord, SetVocab};

use crate::importer::Categories;

/// One set record per category, in accumulator order.
#[instrument(skip_all, fields(categories = categories.len()))]
pub fn category_sets(categories: &Categories) -> Vec<SetRecord> {
    let sets: Vec<SetRecord> = categories.iter().map(|name| category_set(name)).collect();
    debug!(sets = sets.len(), "category sets built");
    sets
}

fn category_set(name: &str) -> SetRecord {
    SetRecord {
        id: ContentId::derive(name),
        vocab: SetVocab::default(),
        tags: vec![SET_TAG.into(), HOME_PAGE_TAG.into()],
        child_tags: vec![name.to_string()],
        title: name.to_string(),
        synopsis: None,
        featured: true,
        thumbnail: None,
    }
}
