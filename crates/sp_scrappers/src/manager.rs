use std::io::IsTerminal;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use kdam::{tqdm, BarExt};
use sp_core::enrich::{annotate_volumes, extract_keywords};
use sp_core::{
    aggregate_corpus, average_word_count, filter_results, parse_sections, Assembler, ContentFetcher, ContentRecord,
    Error, KeywordVolume, Language, PlannerConfig, ReportGenerator, Result, RunReport, SearchProvider, SearchResult,
    SectionMap, Stage,
};
use sp_inference::create_generator;
use sp_storage::{create_cache, CachedFetcher, CachedGenerator, CachedSearch, Memo};

use crate::content::create_fetcher;
use crate::http::at_stage;
use crate::logging::Logger;
use crate::search::create_search_provider;
use crate::volume::DataForSeoVolume;

/// Runs the planning pipeline for one keyword: search, filter, fetch,
/// generate, section and assemble.
pub struct PlannerManager {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn ContentFetcher>,
    generator: Arc<dyn ReportGenerator>,
    volumes: Option<Arc<dyn KeywordVolume>>,
    language: Language,
    blocklist: Vec<String>,
    concurrency: usize,
    show_progress: bool,
    logger: Logger,
}

impl PlannerManager {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn ContentFetcher>,
        generator: Arc<dyn ReportGenerator>,
    ) -> Self {
        Self {
            search,
            fetcher,
            generator,
            volumes: None,
            language: Language::default(),
            blocklist: sp_core::filter::default_blocklist(),
            concurrency: 5,
            show_progress: false,
            logger: Logger::new(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_blocklist(mut self, blocklist: Vec<String>) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_volumes(mut self, volumes: Arc<dyn KeywordVolume>) -> Self {
        self.volumes = Some(volumes);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Builds every backend named by `config`, wrapping them in the response
    /// cache when one is enabled.
    pub async fn from_config(config: &PlannerConfig) -> Result<Self> {
        config.validate()?;

        let mut search = create_search_provider(config)?;
        let mut fetcher = create_fetcher(config)?;
        let mut generator = create_generator(config)?;

        if let Some(store) = create_cache(config.cache, &config.cache_dir).await? {
            let memo = Memo::new(store);
            search = Arc::new(CachedSearch::new(search, memo.clone()));
            fetcher = Arc::new(CachedFetcher::new(fetcher, memo.clone()));
            generator = Arc::new(CachedGenerator::new(generator, memo));
        }

        let mut manager = Self::new(search, fetcher, generator)
            .with_language(config.language)
            .with_blocklist(config.blocklist.clone())
            .with_concurrency(config.concurrency)
            .with_progress(std::io::stderr().is_terminal());

        if config.enrich_volumes {
            let volumes = DataForSeoVolume::from_config(config)?;
            tracing::info!("📈 Keyword volume lookup enabled (using {})", volumes.name());
            manager = manager.with_volumes(Arc::new(volumes));
        }
        Ok(manager)
    }

    /// Ranked results for `keyword` with blocked domains removed, and how
    /// many results the filter dropped.
    pub async fn search_candidates(&self, keyword: &str, logger: &Logger) -> Result<(Vec<SearchResult>, usize)> {
        let results = self
            .search
            .search(keyword)
            .await
            .map_err(at_stage(Stage::Search))?;
        if results.is_empty() {
            return Err(Error::NoResults(format!("search returned nothing for '{}'", keyword)));
        }

        let candidates = filter_results(&results, &self.blocklist);
        logger.info(&format!(
            "🔍 {} results from {}, {} left after filtering",
            results.len(),
            self.search.name(),
            candidates.len()
        ));
        if candidates.is_empty() {
            return Err(Error::NoResults(format!(
                "every result for '{}' was on a blocked domain",
                keyword
            )));
        }
        let filtered = results.len() - candidates.len();
        Ok((candidates, filtered))
    }

    /// Fetches page text for every candidate, `concurrency` at a time, in
    /// ranking order. A failed or too-short page is skipped. Returns the
    /// records and the number of skipped candidates.
    pub async fn fetch_contents(&self, candidates: &[SearchResult], logger: &Logger) -> (Vec<ContentRecord>, usize) {
        let mut bar = self
            .show_progress
            .then(|| tqdm!(total = candidates.len(), desc = "Fetching pages"));

        let mut pages = stream::iter(candidates)
            .map(|candidate| async move {
                let logger = logger.clone().with_prefix(candidate.url.clone());
                match self.fetcher.fetch(&candidate.url).await {
                    Ok(Some(text)) => {
                        logger.debug(&format!("fetched {} words", text.split_whitespace().count()));
                        Some(ContentRecord::from_result(candidate, text))
                    }
                    Ok(None) => {
                        logger.debug("skipped, too little content");
                        None
                    }
                    Err(e) => {
                        logger.warn(&format!("skipped: {}", at_stage(Stage::Content)(e)));
                        None
                    }
                }
            })
            .buffered(self.concurrency);

        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            if let Some(bar) = bar.as_mut() {
                if let Err(e) = bar.update(1) {
                    logger.debug(&format!("progress bar update failed: {}", e));
                }
            }
            records.extend(page);
        }
        if bar.is_some() {
            eprintln!();
        }

        let skipped = candidates.len() - records.len();
        (records, skipped)
    }

    /// Asks the generator for the report. An empty answer is an error.
    pub async fn generate(&self, corpus: &str, keyword: &str) -> Result<String> {
        self.generator
            .generate(corpus, keyword)
            .await
            .map_err(at_stage(Stage::Generation))?
            .filter(|report| !report.trim().is_empty())
            .ok_or_else(|| Error::upstream(Stage::Generation, format!("{} returned an empty report", self.generator.name())))
    }

    /// Appends monthly search volume to the suggested keywords section.
    /// Lookup failures leave the section untouched.
    pub async fn enrich(&self, sections: &mut SectionMap, logger: &Logger) {
        let Some(volumes) = &self.volumes else {
            return;
        };
        let title = self.language.keywords_section();
        let Some(body) = sections.get(title).map(str::to_string) else {
            logger.debug("No keyword section to enrich");
            return;
        };
        let keywords = extract_keywords(&body);
        if keywords.is_empty() {
            return;
        }

        match volumes.volumes(&keywords).await {
            Ok(found) => {
                logger.info(&format!("📈 Search volume for {} keywords from {}", keywords.len(), volumes.name()));
                sections.insert(title, annotate_volumes(&body, &found));
            }
            Err(e) => logger.warn(&format!("Keyword volume lookup failed: {}", e)),
        }
    }

    pub async fn run(&self, keyword: &str) -> Result<RunReport> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(Error::Config("keyword must not be empty".to_string()));
        }
        let logger = self.logger.clone().with_new_prefixes(format!("[{}]", keyword));

        logger.info(&format!("Stage 1/4: searching with {}", self.search.name()));
        let (candidates, filtered) = self.search_candidates(keyword, &logger).await?;

        logger.info(&format!("Stage 2/4: fetching {} pages with {}", candidates.len(), self.fetcher.name()));
        let (records, skipped) = self.fetch_contents(&candidates, &logger).await;
        if records.is_empty() {
            return Err(Error::NoResults(format!(
                "no page for '{}' yielded enough content",
                keyword
            )));
        }
        let average = average_word_count(&records);
        logger.info(&format!(
            "📄 Fetched {}/{} pages, {} words on average",
            records.len(),
            candidates.len(),
            average
        ));

        logger.info(&format!("Stage 3/4: generating report with {}", self.generator.name()));
        let corpus = aggregate_corpus(&records);
        let raw_report = self.generate(&corpus, keyword).await?;

        logger.info("Stage 4/4: assembling report");
        let mut sections = parse_sections(raw_report.as_str());
        self.enrich(&mut sections, &logger).await;
        let view = Assembler::for_language(self.language).present(
            &raw_report,
            &sections,
            &self.language.preferred_order(),
            &records,
        );
        logger.info("✅ Report ready");

        Ok(RunReport {
            keyword: keyword.to_string(),
            generated_at: Utc::now(),
            candidates: candidates.len(),
            filtered,
            skipped,
            sources: records
                .iter()
                .map(|r| SearchResult::new(r.title.clone(), r.source_url.clone()))
                .collect(),
            average_word_count: average,
            raw_report,
            view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sp_core::ReportView;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    struct FakeSearch(Vec<SearchResult>);

    #[async_trait]
    impl SearchProvider for FakeSearch {
        fn name(&self) -> &str {
            "fake"
        }

        async fn search(&self, _keyword: &str) -> Result<Vec<SearchResult>> {
            Ok(self.0.clone())
        }
    }

    /// Serves text for URLs containing "good", fails for "broken", and
    /// reports everything else as too short.
    struct FakeFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentFetcher for FakeFetcher {
        fn name(&self) -> &str {
            "fake"
        }

        async fn fetch(&self, url: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("broken") {
                return Err(Error::upstream(Stage::Content, "502"));
            }
            Ok(url.contains("good").then(|| format!("content of {} with several words", url)))
        }
    }

    struct FakeGenerator(Option<String>);

    #[async_trait]
    impl ReportGenerator for FakeGenerator {
        fn name(&self) -> &str {
            "fake"
        }

        async fn generate(&self, corpus: &str, _keyword: &str) -> Result<Option<String>> {
            assert!(corpus.contains(sp_core::CORPUS_SEPARATOR));
            Ok(self.0.clone())
        }
    }

    struct FakeVolume;

    #[async_trait]
    impl KeywordVolume for FakeVolume {
        fn name(&self) -> &str {
            "fake"
        }

        async fn volumes(&self, keywords: &[String]) -> Result<HashMap<String, Option<u64>>> {
            Ok(keywords.iter().map(|k| (k.clone(), Some(k.len() as u64))).collect())
        }
    }

    const REPORT: &str = "\
### 1. Key Common Points
- shoes need polish

### 3. Suggested Keywords and Semantics
- **Care:** shoe polish, leather care

### 5. FAQ Section (Questions and Answers)
How often?";

    fn results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("Good one", "https://good.example.com/a"),
            SearchResult::new("Video", "https://www.youtube.com/watch?v=1"),
            SearchResult::new("Broken", "https://broken.example.com"),
            SearchResult::new("Short", "https://short.example.com"),
            SearchResult::new("", "https://good.example.org/b"),
        ]
    }

    fn manager(results: Vec<SearchResult>, report: Option<&str>) -> PlannerManager {
        PlannerManager::new(
            Arc::new(FakeSearch(results)),
            Arc::new(FakeFetcher { calls: AtomicUsize::new(0) }),
            Arc::new(FakeGenerator(report.map(str::to_string))),
        )
        .with_language(Language::En)
        .with_concurrency(2)
    }

    #[tokio::test]
    async fn test_run_assembles_sections_and_sources() {
        let report = manager(results(), Some(REPORT)).run("  shoe polish ").await.unwrap();

        assert_eq!(report.keyword, "shoe polish");
        assert_eq!(report.candidates, 4);
        assert_eq!(report.filtered, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(
            report.sources.iter().map(|s| s.url.as_str()).collect::<Vec<_>>(),
            vec!["https://good.example.com/a", "https://good.example.org/b"]
        );
        assert_eq!(report.sources[1].title, "https://good.example.org/b");

        let ReportView::Sections(panels) = &report.view else {
            panic!("expected sections, got {:?}", report.view);
        };
        let titles: Vec<&str> = panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Key Common Points",
                "Suggested Keywords and Semantics",
                "FAQ Section (Questions and Answers)",
                "Sources",
            ]
        );
        assert!(panels[3].body.contains("- [Good one](https://good.example.com/a)"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_stage_logs_carry_keyword_prefix() {
        let captured = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        manager(results(), Some(REPORT)).run("shoe polish").await.unwrap();

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("[shoe polish] 🔍 5 results from fake, 4 left after filtering"));
        assert!(logs.contains("[shoe polish] https://broken.example.com skipped:"));
        assert!(logs.contains("[shoe polish] https://short.example.com skipped, too little content"));
    }

    #[tokio::test]
    async fn test_blocked_results_only_is_no_results() {
        let only_blocked = vec![SearchResult::new("Video", "https://youtube.com/x")];
        let err = manager(only_blocked, Some(REPORT)).run("buty").await.unwrap_err();
        assert!(err.is_no_results());

        let err = manager(Vec::new(), Some(REPORT)).run("buty").await.unwrap_err();
        assert!(err.is_no_results());
    }

    #[tokio::test]
    async fn test_no_usable_content_is_no_results() {
        let results = vec![
            SearchResult::new("Broken", "https://broken.example.com"),
            SearchResult::new("Short", "https://short.example.com"),
        ];
        let err = manager(results, Some(REPORT)).run("buty").await.unwrap_err();
        assert!(err.is_no_results());
    }

    #[tokio::test]
    async fn test_empty_keyword_is_rejected() {
        let err = manager(results(), Some(REPORT)).run("   ").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_empty_generation_is_upstream_error() {
        let err = manager(results(), None).run("buty").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable { stage: Stage::Generation, .. }));

        let err = manager(results(), Some("  \n")).run("buty").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable { stage: Stage::Generation, .. }));
    }

    #[tokio::test]
    async fn test_unmatched_sections_fall_back_to_raw() {
        let raw = "### Something else\nbody";
        let report = manager(results(), Some(raw)).run("buty").await.unwrap();
        assert_eq!(report.view, ReportView::Raw(raw.to_string()));
    }

    #[tokio::test]
    async fn test_enrich_annotates_keyword_section() {
        let manager = manager(results(), Some(REPORT)).with_volumes(Arc::new(FakeVolume));
        let report = manager.run("shoe polish").await.unwrap();

        let ReportView::Sections(panels) = &report.view else {
            panic!("expected sections");
        };
        let keywords = panels
            .iter()
            .find(|p| p.title == "Suggested Keywords and Semantics")
            .unwrap();
        assert_eq!(keywords.body, "- **Care:** shoe polish (11/mo), leather care (12/mo)");
        assert!(report.raw_report.contains("- **Care:** shoe polish, leather care"));
    }
}
