//! TOC (Table of Contents) builder.
//!
//! Recovers the step index of a rendered article from its HTML. Steps are
//! found by splitting on the step heading class, so this must stay in sync
//! with the markup emitted by `basin_markup`.

use tracing::{debug, instrument};

use basin_markup::{STEP_HEADLINE_CLASS, step_anchor};
use basin_shared::StepDescriptor;

/// Build the table of contents for rendered article HTML.
///
/// Everything before the first step heading is preamble and produces no
/// entry, so the result has one descriptor per heading, indexed from 0.
#[instrument(skip_all, fields(len = html.len()))]
pub fn build_toc(html: &str) -> Vec<StepDescriptor> {
    let steps = html.split(STEP_HEADLINE_CLASS).count().saturating_sub(1);
    debug!(steps, "TOC built from step headings");
    (0..steps).map(step_descriptor).collect()
}

/// Descriptor for the step at zero-based `index`.
pub fn step_descriptor(index: usize) -> StepDescriptor {
    StepDescriptor {
        id: index,
        label: format!("Step {}", index + 1),
        index_label: index.to_string(),
        index,
        content: format!("#{}", step_anchor(index)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
