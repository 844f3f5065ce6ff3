//! Splits a generated Markdown report into named sections.
//!
//! A section starts at a level-3 heading (`### Title` or `### 2. Title`) and
//! runs until the next level-3 heading or the end of the document. Deeper or
//! shallower headings (`##`, `####`) never start a section.
//!
//! When at least one heading carries an ordinal, only numbered headings are
//! boundaries. This keeps un-numbered `### Subpoint` lines that the model
//! writes inside the article outline attached to their enclosing section.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::SectionMap;

pub const SECTION_MARKER: &str = "###";

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###(?P<rest>[^#].*)?$").expect("valid regex"));
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.(?:\s+|$)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading {
    numbered: bool,
    title: String,
}

fn parse_heading(line: &str) -> Option<Heading> {
    let line = line.trim_end();
    let caps = HEADING_RE.captures(line)?;
    let rest = caps.name("rest").map(|m| m.as_str().trim()).unwrap_or_default();

    match ORDINAL_RE.find(rest) {
        Some(ordinal) => Some(Heading {
            numbered: true,
            title: rest[ordinal.end()..].trim().to_string(),
        }),
        None => Some(Heading {
            numbered: false,
            title: rest.to_string(),
        }),
    }
}

/// Parses `raw` into a [`SectionMap`].
///
/// Titles have their ordinal stripped and are trimmed; bodies are trimmed.
/// Sections with an empty title or body are skipped. A repeated title
/// replaces the earlier body. Never fails: unparseable input yields an empty
/// map.
pub fn parse_sections<'a>(raw: impl Into<Option<&'a str>>) -> SectionMap {
    let mut sections = SectionMap::new();
    let Some(raw) = raw.into() else {
        return sections;
    };
    if raw.trim().is_empty() {
        return sections;
    }

    let lines: Vec<&str> = raw.lines().collect();
    let headings: Vec<(usize, Heading)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| parse_heading(line).map(|h| (i, h)))
        .collect();

    let numbered = headings.iter().any(|(_, h)| h.numbered);
    let boundaries: Vec<(usize, Heading)> = headings
        .into_iter()
        .filter(|(_, h)| !numbered || h.numbered)
        .collect();

    for (n, (start, heading)) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(n + 1)
            .map(|(i, _)| *i)
            .unwrap_or(lines.len());
        let body = lines[start + 1..end].join("\n");
        let body = body.trim();
        if heading.title.is_empty() || body.is_empty() {
            continue;
        }
        if sections.insert(heading.title.clone(), body).is_some() {
            tracing::debug!("Duplicate report section '{}', keeping the later one", heading.title);
        }
    }

    sections
}

/// Renders one section back into the heading convention the parser reads,
/// numbered with `position`.
///
/// The heading is always numbered so that un-numbered `###` lines kept in
/// the body stay part of it when the output is parsed again. Bodies produced
/// by [`parse_sections`] never contain a numbered `###` line.
pub fn render_section(position: usize, title: &str, body: &str) -> String {
    format!("{} {}. {}\n\n{}", SECTION_MARKER, position, title, body)
}
