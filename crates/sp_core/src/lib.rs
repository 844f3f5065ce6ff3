pub mod assemble;
pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod language;
pub mod models;
pub mod report;
pub mod storage;
pub mod types;

pub use assemble::Assembler;
pub use config::{CacheKind, FetcherKind, GeneratorKind, PlannerConfig, SearchKind, Secrets};
pub use error::{Error, Result, Stage};
pub use filter::{filter_results, DEFAULT_BLOCKLIST};
pub use language::Language;
pub use models::{ContentFetcher, KeywordVolume, ReportGenerator, SearchProvider};
pub use report::parse_sections;
pub use storage::CacheStore;
pub use types::{
    aggregate_corpus, average_word_count, ContentRecord, DisplaySection, ReportView, RunReport,
    SearchResult, SectionMap, CORPUS_SEPARATOR,
};
