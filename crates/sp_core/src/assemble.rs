use crate::language::Language;
use crate::types::{ContentRecord, DisplaySection, ReportView, SectionMap};

/// Builds the ordered list of report panels from parsed sections.
#[derive(Debug, Clone)]
pub struct Assembler {
    sources_label: String,
    sources_intro: String,
}

impl Assembler {
    pub fn new(sources_label: impl Into<String>, sources_intro: impl Into<String>) -> Self {
        Self {
            sources_label: sources_label.into(),
            sources_intro: sources_intro.into(),
        }
    }

    pub fn for_language(language: Language) -> Self {
        Self::new(language.sources_label(), language.sources_intro())
    }

    pub fn sources_label(&self) -> &str {
        &self.sources_label
    }

    /// Markdown body of the synthetic sources panel.
    pub fn sources_body(&self, sources: &[ContentRecord]) -> String {
        let items = sources
            .iter()
            .map(|s| format!("- [{}]({})", s.title, s.source_url))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n{}", self.sources_intro, items)
    }

    /// Picks the sections named in `preferred_order` that have a non-empty
    /// body, in that order, and appends the sources panel last.
    ///
    /// A generated section carrying the sources label is always replaced by
    /// the synthetic one. Returns an empty list when no generated section
    /// matches, in which case the caller shows the raw report instead.
    pub fn assemble(
        &self,
        sections: &SectionMap,
        preferred_order: &[String],
        sources: &[ContentRecord],
    ) -> Vec<DisplaySection> {
        let mut panels: Vec<DisplaySection> = Vec::new();
        for title in preferred_order {
            if *title == self.sources_label || panels.iter().any(|p| p.title == *title) {
                continue;
            }
            if let Some(body) = sections.get(title) {
                if !body.trim().is_empty() {
                    panels.push(DisplaySection::new(title.clone(), body.trim()));
                }
            }
        }

        if panels.is_empty() {
            return panels;
        }

        if !sources.is_empty() {
            panels.push(DisplaySection::new(
                self.sources_label.clone(),
                self.sources_body(sources),
            ));
        }
        panels
    }

    /// Assembles the panels, falling back to the raw report when nothing
    /// matched.
    pub fn present(
        &self,
        raw_report: &str,
        sections: &SectionMap,
        preferred_order: &[String],
        sources: &[ContentRecord],
    ) -> ReportView {
        let panels = self.assemble(sections, preferred_order, sources);
        if panels.is_empty() {
            if sections.is_empty() {
                tracing::warn!("No sections found in the generated report, showing it unformatted");
            } else {
                tracing::warn!(
                    "Report sections ({}) did not match the expected titles, showing it unformatted",
                    sections.titles().collect::<Vec<_>>().join(", ")
                );
            }
            ReportView::Raw(raw_report.to_string())
        } else {
            ReportView::Sections(panels)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(n: usize) -> Vec<ContentRecord> {
        (1..=n)
            .map(|i| ContentRecord {
                source_url: format!("https://example.com/{}", i),
                title: format!("Page {}", i),
                text: "text".to_string(),
            })
            .collect()
    }

    fn order(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scenario_key_points_and_sources() {
        let assembler = Assembler::for_language(Language::En);
        let sections: SectionMap = [("Key Points", "- A\n- B"), ("Unrelated", "x")].into_iter().collect();

        let panels = assembler.assemble(&sections, &order(&["Key Points", "Structure"]), &sources(2));

        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0], DisplaySection::new("Key Points", "- A\n- B"));
        assert_eq!(panels[1].title, "Sources");
        assert_eq!(
            panels[1].body,
            "Below are the URLs whose content was successfully fetched and analysed:\n\
             - [Page 1](https://example.com/1)\n\
             - [Page 2](https://example.com/2)"
        );
    }

    #[test]
    fn test_no_overlap_returns_empty() {
        let assembler = Assembler::for_language(Language::En);
        let sections: SectionMap = [("Other", "x")].into_iter().collect();
        assert!(assembler.assemble(&sections, &order(&["Key Points"]), &sources(3)).is_empty());
        assert!(assembler.assemble(&SectionMap::new(), &order(&["Key Points"]), &[]).is_empty());
    }

    #[test]
    fn test_sources_forced_last_and_overrides_generated() {
        let assembler = Assembler::for_language(Language::En);
        let sections: SectionMap = [("Sources", "model made this up"), ("B", "b"), ("A", "a")]
            .into_iter()
            .collect();

        let panels = assembler.assemble(&sections, &order(&["Sources", "A", "B"]), &sources(1));
        let titles: Vec<_> = panels.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(titles, vec!["A", "B", "Sources"]);
        assert!(!panels[2].body.contains("made this up"));
    }

    #[test]
    fn test_no_sources_panel_without_records() {
        let assembler = Assembler::for_language(Language::Pl);
        let sections: SectionMap = [("A", "a")].into_iter().collect();
        let panels = assembler.assemble(&sections, &order(&["A", "Analizowane Źródła"]), &[]);
        assert_eq!(panels, vec![DisplaySection::new("A", "a")]);
    }

    #[test]
    fn test_present_falls_back_to_raw() {
        let assembler = Assembler::for_language(Language::En);
        let view = assembler.present("raw text", &SectionMap::new(), &order(&["A"]), &sources(1));
        assert_eq!(view, ReportView::Raw("raw text".to_string()));

        let sections: SectionMap = [("A", "a")].into_iter().collect();
        let view = assembler.present("### A\na", &sections, &order(&["A"]), &sources(1));
        assert!(matches!(view, ReportView::Sections(ref panels) if panels.len() == 2));
    }
}
