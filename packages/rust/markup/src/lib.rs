//! Instruction text to step markup.
//!
//! Recipe instructions are stored as one line of text in which steps are
//! separated by a literal `\n` escape and images are referenced inline as
//! `[image:N]`. This crate turns that into step-structured HTML. The
//! heading class and anchor naming defined here are also what the table of
//! contents builder splits on, so both sides must use these helpers.

use std::sync::LazyLock;

use basin_shared::ContentId;
use regex::Regex;
use tracing::{debug, instrument};

/// Literal two-character escape separating steps in raw instructions.
pub const STEP_SEPARATOR: &str = "\\n";

/// Class carried by every step heading; one occurrence per step.
pub const STEP_HEADLINE_CLASS: &str = "mw-headline";

/// Default display height (px) for embedded images.
pub const DEFAULT_IMAGE_HEIGHT: u32 = 400;

/// Matches an image placeholder, capturing its index.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[image:(\d+)\]").expect("placeholder regex"));

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options for rendering instruction markup.
#[derive(Debug, Clone)]
pub struct MarkupOptions {
    /// Height attribute of embedded `<img>` tags.
    pub image_height: u32,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            image_height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}

/// Rendered instruction markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedInstructions {
    /// Final HTML body.
    pub html: String,
    /// Number of step headings emitted.
    pub step_count: usize,
    /// Placeholder indices left in the text because they exceed the image
    /// list, in order of appearance.
    pub unresolved: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Transformer
// ---------------------------------------------------------------------------

/// Anchor id of the step at zero-based `index` (`Step0`, `Step1`, ...).
pub fn step_anchor(index: usize) -> String {
    format!("Step{index}")
}

/// Split raw instructions into trimmed, non-empty steps in source order.
pub fn split_steps(raw: &str) -> Vec<&str> {
    raw.split(STEP_SEPARATOR)
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .collect()
}

/// Render raw instructions as step markup and substitute image placeholders.
///
/// `images[i]` replaces every `[image:i]`. Placeholders outside the list are
/// left as literal text and reported in [`RenderedInstructions::unresolved`].
#[instrument(skip_all, fields(images = images.len()))]
pub fn transform_instructions(
    raw: &str,
    images: &[ContentId],
    opts: &MarkupOptions,
) -> RenderedInstructions {
    let steps = split_steps(raw);
    let html: String = steps
        .iter()
        .enumerate()
        .map(|(index, text)| render_step(index, text))
        .collect();

    let html = substitute_images(html, images, opts.image_height);
    let unresolved = unresolved_placeholders(&html);

    debug!(
        steps = steps.len(),
        unresolved = unresolved.len(),
        len = html.len(),
        "instructions rendered"
    );

    RenderedInstructions {
        html,
        step_count: steps.len(),
        unresolved,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn render_step(index: usize, text: &str) -> String {
    format!(
        " <span class=\"{STEP_HEADLINE_CLASS}\" id=\"{anchor}\"><h2>Step {number}</h2></span><p>{text}</p> ",
        anchor = step_anchor(index),
        number = index + 1,
    )
}

fn image_tag(id: &ContentId, height: u32) -> String {
    format!(" <img src=\"{id}\" height=\"{height}\"> ")
}

/// Replace placeholders positionally against `images`.
fn substitute_images(mut html: String, images: &[ContentId], height: u32) -> String {
    for (index, id) in images.iter().enumerate() {
        let placeholder = format!("[image:{index}]");
        if html.contains(&placeholder) {
            html = html.replace(&placeholder, &image_tag(id, height));
        }
    }
    html
}

fn unresolved_placeholders(html: &str) -> Vec<usize> {
    PLACEHOLDER_RE
        .captures_iter(html)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}
