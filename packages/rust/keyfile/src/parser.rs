//! Line-oriented key file parser.
//!
//! Recognized lines (after trimming surrounding whitespace):
//! - blank lines and `# comments`: ignored
//! - `[Section Name]`: opens (or re-opens) a section
//! - `key=value`: entry in the current section, value kept raw

use std::path::Path;
use std::sync::LazyLock;

use basin_shared::{BasinError, Result};
use regex::Regex;

use crate::Section;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches `[Name]`. Brackets are not allowed inside the name.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\[\]]*)\]$").expect("section regex"));

/// Matches `key=value`, with optional whitespace around `=`.
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=]+?)\s*=\s*(.*)$").expect("entry regex"));

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse key file text into sections, in first-appearance order.
///
/// `origin` only labels errors and is recorded on each section.
pub(crate) fn parse_sections(content: &str, origin: &Path) -> Result<Vec<Section>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut sections: Vec<Section> = Vec::new();
    // Index into `sections` of the section currently receiving entries.
    let mut current: Option<usize> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(trimmed) {
            let name = caps[1].trim();
            if name.is_empty() {
                return Err(BasinError::parse(origin, line_no, "empty section name"));
            }
            // A repeated header merges into the earlier section.
            let pos = match sections.iter().position(|s| s.name == name) {
                Some(pos) => pos,
                None => {
                    sections.push(Section::new(name, origin));
                    sections.len() - 1
                }
            };
            current = Some(pos);
            continue;
        }

        if let Some(caps) = ENTRY_RE.captures(trimmed) {
            let Some(pos) = current else {
                return Err(BasinError::parse(
                    origin,
                    line_no,
                    "key/value pair appears before any [section]",
                ));
            };
            sections[pos].insert(caps[1].trim(), &caps[2]);
            continue;
        }

        return Err(BasinError::parse(
            origin,
            line_no,
            format!("expected [section] or key=value, found `{trimmed}`"),
        ));
    }

    Ok(sections)
}
