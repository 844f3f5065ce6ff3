//! Search-volume annotation for the suggested keywords section.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)(?P<marker>[-*+]|\d+\.)\s+(?P<text>.+?)\s*$").expect("valid regex")
});
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`]+").expect("valid regex"));

const MAX_KEYWORD_LEN: usize = 80;
const MAX_KEYWORD_WORDS: usize = 8;
/// Characters that only appear in prose, never in a search phrase.
const PROSE_MARKS: &[char] = &['(', ')', '[', ']', '{', '}', ':', '?', '!', '"', '='];

/// A bullet split into an optional group label and its keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BulletLine {
    indent: String,
    marker: String,
    label: Option<String>,
    keywords: Vec<String>,
}

fn clean(text: &str) -> String {
    EMPHASIS_RE.replace_all(text, "").trim().to_string()
}

fn is_keyword(candidate: &str) -> bool {
    let len = candidate.chars().count();
    (2..=MAX_KEYWORD_LEN).contains(&len)
        && candidate.split_whitespace().count() <= MAX_KEYWORD_WORDS
        && !candidate.contains(PROSE_MARKS)
        && !candidate.contains(". ")
}

fn parse_bullet(line: &str) -> Option<BulletLine> {
    let caps = BULLET_RE.captures(line)?;
    let text = clean(&caps["text"]);

    let (label, list) = match text.split_once(':') {
        Some((label, rest)) if !rest.trim().is_empty() => (Some(label.trim().to_string()), rest),
        Some((_, _)) => return None,
        None => (None, text.as_str()),
    };

    let keywords: Vec<String> = list
        .split([',', ';'])
        .map(|k| k.trim().trim_end_matches('.').trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    // One prose-like item means the whole bullet is prose.
    if keywords.is_empty() || !keywords.iter().all(|k| is_keyword(k)) {
        return None;
    }

    Some(BulletLine {
        indent: caps["indent"].to_string(),
        marker: caps["marker"].to_string(),
        label,
        keywords,
    })
}

/// Keywords listed as bullets in a section body, deduplicated
/// case-insensitively in order of appearance.
///
/// A bullet of the form `Label: a, b, c` contributes `a`, `b` and `c`; a
/// plain bullet contributes its comma-separated items. Bullets with any
/// prose-like item (brackets, questions, long sentences) contribute nothing.
pub fn extract_keywords(body: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    body.lines()
        .filter_map(parse_bullet)
        .flat_map(|b| b.keywords)
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect()
}

fn lookup(volumes: &HashMap<String, Option<u64>>, keyword: &str) -> Option<u64> {
    volumes.get(keyword).copied().flatten().or_else(|| {
        volumes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword) || k.to_lowercase() == keyword.to_lowercase())
            .and_then(|(_, v)| *v)
    })
}

fn format_volume(volume: Option<u64>) -> String {
    match volume {
        Some(v) => format!("({}/mo)", v),
        None => "(n/a)".to_string(),
    }
}

/// Rewrites keyword bullets with their monthly search volume appended to
/// each keyword. Lines that are not keyword bullets are kept verbatim.
pub fn annotate_volumes(body: &str, volumes: &HashMap<String, Option<u64>>) -> String {
    body.lines()
        .map(|line| match parse_bullet(line) {
            Some(bullet) => {
                let annotated = bullet
                    .keywords
                    .iter()
                    .map(|k| format!("{} {}", k, format_volume(lookup(volumes, k))))
                    .collect::<Vec<_>>()
                    .join(", ");
                match bullet.label {
                    Some(label) => format!("{}{} **{}:** {}", bullet.indent, bullet.marker, label, annotated),
                    None => format!("{}{} {}", bullet.indent, bullet.marker, annotated),
                }
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "\
Intencja wyszukiwania: informacyjna.

- **Pielęgnacja:** pasta do butów, impregnat, szczotka
- jak czyścić buty skórzane
* Pasta do butów
1. konserwacja skóry

Other prose line";

    #[test]
    fn test_extract_keywords_handles_groups_and_duplicates() {
        assert_eq!(
            extract_keywords(BODY),
            vec![
                "pasta do butów",
                "impregnat",
                "szczotka",
                "jak czyścić buty skórzane",
                "konserwacja skóry",
            ]
        );
    }

    #[test]
    fn test_extract_keywords_skips_headings_and_questions() {
        let body = "- **Grupa 1:**\n- Jak dbać o buty?\n- ok keyword";
        assert_eq!(extract_keywords(body), vec!["ok keyword"]);
    }

    #[test]
    fn test_annotate_volumes() {
        let mut volumes = HashMap::new();
        volumes.insert("pasta do butów".to_string(), Some(1900));
        volumes.insert("impregnat".to_string(), None);
        volumes.insert("Konserwacja skóry".to_string(), Some(40));

        let annotated = annotate_volumes(BODY, &volumes);
        let lines: Vec<&str> = annotated.lines().collect();

        assert_eq!(lines[0], "Intencja wyszukiwania: informacyjna.");
        assert_eq!(
            lines[2],
            "- **Pielęgnacja:** pasta do butów (1900/mo), impregnat (n/a), szczotka (n/a)"
        );
        assert_eq!(lines[4], "* Pasta do butów (1900/mo)");
        assert_eq!(lines[5], "1. konserwacja skóry (40/mo)");
        assert_eq!(lines[7], "Other prose line");
    }

    #[test]
    fn test_prose_bullets_are_left_alone() {
        let body = "\
- **Intencja wyszukiwania:** informacyjna (porady, instrukcje)
- Warto wspomnieć o tym, że skóra potrzebuje regularnego nawilżania i ochrony przed solą
- **Frazy:** pasta do butów, impregnat";
        assert_eq!(extract_keywords(body), vec!["pasta do butów", "impregnat"]);

        let mut volumes = HashMap::new();
        volumes.insert("impregnat".to_string(), Some(320));
        let annotated = annotate_volumes(body, &volumes);
        let lines: Vec<&str> = annotated.lines().collect();
        assert_eq!(lines[0], "- **Intencja wyszukiwania:** informacyjna (porady, instrukcje)");
        assert_eq!(
            lines[1],
            "- Warto wspomnieć o tym, że skóra potrzebuje regularnego nawilżania i ochrony przed solą"
        );
        assert_eq!(lines[2], "- **Frazy:** pasta do butów (n/a), impregnat (320/mo)");
    }
}
