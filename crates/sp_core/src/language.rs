use serde::{Deserialize, Serialize};

/// Language of the generated report, its section titles and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pl,
    En,
}

const PL_SECTIONS: [&str; 5] = [
    "Kluczowe Punkty Wspólne",
    "Unikalne i Wyróżniające Się Elementy",
    "Sugerowane Słowa Kluczowe i Semantyka",
    "Proponowana Struktura Artykułu (Szkic)",
    "Sekcja FAQ (Pytania i Odpowiedzi)",
];

const EN_SECTIONS: [&str; 5] = [
    "Key Common Points",
    "Unique and Distinctive Elements",
    "Suggested Keywords and Semantics",
    "Proposed Article Structure (Outline)",
    "FAQ Section (Questions and Answers)",
];

impl Language {
    /// ISO 639-1 code, also used as the search locale.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Pl => "pl",
            Language::En => "en",
        }
    }

    /// Country used for localized search results.
    pub fn country(&self) -> &'static str {
        match self {
            Language::Pl => "pl",
            Language::En => "us",
        }
    }

    /// The five report sections the generator is asked for, in prompt order.
    pub fn section_titles(&self) -> [&'static str; 5] {
        match self {
            Language::Pl => PL_SECTIONS,
            Language::En => EN_SECTIONS,
        }
    }

    /// Title of the section holding the suggested keyword list.
    pub fn keywords_section(&self) -> &'static str {
        self.section_titles()[2]
    }

    pub fn sources_label(&self) -> &'static str {
        match self {
            Language::Pl => "Analizowane Źródła",
            Language::En => "Sources",
        }
    }

    pub fn sources_intro(&self) -> &'static str {
        match self {
            Language::Pl => {
                "Poniżej lista adresów URL, których treść została pomyślnie pobrana i przeanalizowana przez AI:"
            }
            Language::En => "Below are the URLs whose content was successfully fetched and analysed:",
        }
    }

    /// Display order of the report panels, sources last.
    pub fn preferred_order(&self) -> Vec<String> {
        self.section_titles()
            .iter()
            .chain(std::iter::once(&self.sources_label()))
            .map(|s| s.to_string())
            .collect()
    }
}
