use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator placed between page texts in the corpus handed to the generator.
pub const CORPUS_SEPARATOR: &str = "\n\n---\n\n";

/// One ranked entry returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Title to show for this result, falling back to the URL when the
    /// provider returned none.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// Extracted page text for one search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub source_url: String,
    pub title: String,
    pub text: String,
}

impl ContentRecord {
    pub fn from_result(result: &SearchResult, text: String) -> Self {
        Self {
            source_url: result.url.clone(),
            title: result.display_title().to_string(),
            text,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Joins all page texts into the single corpus sent to the generator.
pub fn aggregate_corpus(records: &[ContentRecord]) -> String {
    records
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(CORPUS_SEPARATOR)
}

/// Mean word count over the fetched pages, rounded down. Zero when empty.
pub fn average_word_count(records: &[ContentRecord]) -> usize {
    if records.is_empty() {
        return 0;
    }
    records.iter().map(ContentRecord::word_count).sum::<usize>() / records.len()
}

/// Section title to body mapping, ordered by first discovery.
///
/// Inserting an existing title replaces its body in place, so a later
/// duplicate wins while the entry keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a section. Returns the previous body if the title
    /// was already present.
    pub fn insert(&mut self, title: impl Into<String>, body: impl Into<String>) -> Option<String> {
        let title = title.into();
        let body = body.into();
        match self.entries.iter_mut().find(|(t, _)| *t == title) {
            Some((_, existing)) => Some(std::mem::replace(existing, body)),
            None => {
                self.entries.push((title, body));
                None
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, body)| body.as_str())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, b)| (t.as_str(), b.as_str()))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }
}

impl<T: Into<String>, B: Into<String>> FromIterator<(T, B)> for SectionMap {
    fn from_iter<I: IntoIterator<Item = (T, B)>>(iter: I) -> Self {
        let mut map = SectionMap::new();
        for (title, body) in iter {
            map.insert(title, body);
        }
        map
    }
}

/// One panel of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySection {
    pub title: String,
    pub body: String,
}

impl DisplaySection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// How the generated report should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum ReportView {
    /// Sections matched the preferred order.
    Sections(Vec<DisplaySection>),
    /// Nothing could be matched; show the generator output as-is.
    Raw(String),
}

/// Everything produced by one successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub keyword: String,
    pub generated_at: DateTime<Utc>,
    /// Results left after the domain filter
    pub candidates: usize,
    /// Results removed by the domain filter
    pub filtered: usize,
    /// Candidates whose page failed or had too little text
    pub skipped: usize,
    pub sources: Vec<SearchResult>,
    pub average_word_count: usize,
    pub raw_report: String,
    pub view: ReportView,
}
