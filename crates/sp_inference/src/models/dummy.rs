use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use sp_core::{Language, ReportGenerator, Result, CORPUS_SEPARATOR};

/// Offline generator that derives a report skeleton from the corpus itself.
/// Useful for exercising the pipeline without a model API key.
pub struct DummyGenerator {
    language: Language,
    label: String,
}

impl fmt::Debug for DummyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyGenerator").field("language", &self.language).finish()
    }
}

impl DummyGenerator {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            label: format!("dummy:{}", language.code()),
        }
    }
}

fn first_sentence(text: &str) -> &str {
    text.split_inclusive(['.', '!', '?'])
        .next()
        .unwrap_or(text)
        .trim()
}

fn frequent_words(corpus: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in corpus.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() >= 5 {
            *counts.entry(word.to_lowercase()).or_default() += 1;
        }
    }
    let mut words: Vec<(String, usize)> = counts.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.into_iter().take(limit).map(|(w, _)| w).collect()
}

#[async_trait]
impl ReportGenerator for DummyGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(&self, corpus: &str, keyword: &str) -> Result<Option<String>> {
        if corpus.trim().is_empty() {
            return Ok(None);
        }
        let pages: Vec<&str> = corpus.split(CORPUS_SEPARATOR).collect();
        let [common, unique, keywords, structure, faq] = self.language.section_titles();

        let points = pages
            .iter()
            .map(|p| format!("- {}", first_sentence(p)))
            .collect::<Vec<_>>()
            .join("\n");
        let words = frequent_words(corpus, 10);
        let keyword_list = format!("- **{}:** {}", keyword, words.join(", "));
        let outline = words
            .iter()
            .take(4)
            .map(|w| format!("## {}\n### {}", w, keyword))
            .collect::<Vec<_>>()
            .join("\n");

        let report = format!(
            "### 1. {common}\n{points}\n\n\
             ### 2. {unique}\n- {pages} source(s) analysed\n\n\
             ### 3. {keywords}\n{keyword_list}\n\n\
             ### 4. {structure}\n# {keyword}\n{outline}\n\n\
             ### 5. {faq}\n**{keyword}?**\n{answer}\n",
            pages = pages.len(),
            answer = first_sentence(pages[0]),
        );
        Ok(Some(report))
    }
}
