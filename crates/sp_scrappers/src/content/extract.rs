//! Boilerplate-free text extraction from article HTML.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Elements whose text is collected.
const BLOCKS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "blockquote", "pre"];

/// Elements whose subtree is navigation, chrome or non-prose.
const SKIPPED: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "form", "table", "figure",
    "button", "select", "template", "svg",
];

/// Page-wide wrappers on form-based and table-layout sites. Only ignored
/// when nothing else yields prose.
const LAYOUT: &[&str] = &["form", "table"];

/// Containers tried in order; the one with the most text wins.
const ROOTS: &[&str] = &["article", "main", "[role=main]"];

fn is_comment_block(el: &ElementRef) -> bool {
    let value = el.value();
    let mentions_comment = |s: &str| {
        let s = s.to_ascii_lowercase();
        s.contains("comment") || s.contains("komentarz")
    };
    value.id().map(mentions_comment).unwrap_or(false) || value.classes().any(mentions_comment)
}

/// True when an element between `el` and `root` is a block, chrome or a
/// comment thread. Wrappers outside `root` never count.
fn is_excluded(el: &ElementRef, root: &ElementRef, skipped: &[&str]) -> bool {
    el.ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|a| {
            let name = a.value().name();
            BLOCKS.contains(&name) || skipped.contains(&name) || is_comment_block(&a)
        })
}

fn collect_blocks(root: ElementRef, blocks: &Selector, skipped: &[&str]) -> Vec<String> {
    root.select(blocks)
        .filter(|el| !is_excluded(el, &root, skipped) && !is_comment_block(el))
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|text| normalize_whitespace(&text))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Collapses every whitespace run into one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Extracts the readable prose of a page as a single normalized line.
/// Returns `None` when the page has no prose at all.
pub fn extract_main_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let blocks = Selector::parse(&BLOCKS.join(", ")).ok()?;

    let mut best: Vec<String> = Vec::new();
    for root in ROOTS {
        let Ok(selector) = Selector::parse(root) else {
            continue;
        };
        for candidate in document.select(&selector) {
            let texts = collect_blocks(candidate, &blocks, SKIPPED);
            let len: usize = texts.iter().map(String::len).sum();
            if len > best.iter().map(String::len).sum::<usize>() {
                best = texts;
            }
        }
    }

    if best.is_empty() {
        let body = Selector::parse("body").ok()?;
        if let Some(body) = document.select(&body).next() {
            best = collect_blocks(body, &blocks, SKIPPED);
            if best.is_empty() {
                let lenient: Vec<&str> = SKIPPED.iter().copied().filter(|s| !LAYOUT.contains(s)).collect();
                best = collect_blocks(body, &blocks, &lenient);
            }
        }
    }

    let text = normalize_whitespace(&best.join(" "));
    (!text.is_empty()).then_some(text)
}

/// Applies the minimum length floor: text of `min_length` characters or
/// fewer counts as a failed extraction.
pub fn accept_content(text: Option<String>, min_length: usize) -> Option<String> {
    text.map(|t| normalize_whitespace(&t))
        .filter(|t| t.chars().count() > min_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>T</title><style>p { color: red }</style></head>
        <body>
          <header><p>Site header</p></header>
          <nav><ul><li>Home</li><li>Blog</li></ul></nav>
          <div class="teaser"><p>Sidebar teaser</p></div>
          <article>
            <h1>Jak dbać o buty</h1>
            <p>Skórzane   buty
               wymagają regularnej pielęgnacji.</p>
            <ul><li><p>Czyść</p> szczotką</li></ul>
            <table><tr><td>Tabela</td></tr></table>
            <div id="comments"><p>Świetny artykuł!</p></div>
          </article>
          <footer><p>Copyright</p></footer>
          <script>var x = 1;</script>
        </body></html>"#;

    #[test]
    fn test_extracts_article_prose_only() {
        let text = extract_main_text(PAGE).unwrap();
        assert_eq!(
            text,
            "Jak dbać o buty Skórzane buty wymagają regularnej pielęgnacji. Czyść szczotką"
        );
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = "<html><body><nav><p>menu</p></nav><p>Body paragraph.</p><div><p>Second.</p></div></body></html>";
        assert_eq!(extract_main_text(html).as_deref(), Some("Body paragraph. Second."));
    }

    #[test]
    fn test_empty_page() {
        assert!(extract_main_text("<html><body><script>x()</script></body></html>").is_none());
        assert!(extract_main_text("").is_none());
    }

    #[test]
    fn test_length_floor_is_exclusive() {
        let exactly = "a".repeat(100);
        assert!(accept_content(Some(exactly.clone()), 100).is_none());
        assert!(accept_content(Some(format!("{} b", exactly)), 100).is_some());
        assert!(accept_content(None, 100).is_none());
        assert_eq!(accept_content(Some("  x \n\t y ".to_string()), 1).as_deref(), Some("x y"));
    }

    #[test]
    fn test_wrappers_around_article_are_ignored() {
        let html = "<html><body><form id=\"aspnetForm\"><article><p>Treść artykułu w formularzu.</p></article></form></body></html>";
        assert_eq!(extract_main_text(html).as_deref(), Some("Treść artykułu w formularzu."));

        let html = "<html><body><div class=\"post has-comments\"><article><p>Post body.</p></article>\
                    <div class=\"comment\"><p>Nice!</p></div></div></body></html>";
        assert_eq!(extract_main_text(html).as_deref(), Some("Post body."));
    }

    #[test]
    fn test_page_wide_layout_wrapper_falls_back() {
        let html = "<html><body><form><table><tr><td><p>Layout cell prose.</p></td></tr></table></form></body></html>";
        assert_eq!(extract_main_text(html).as_deref(), Some("Layout cell prose."));
    }
}
