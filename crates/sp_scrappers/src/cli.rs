use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use sp_core::report::render_section;
use sp_core::{
    CacheKind, CacheStore, FetcherKind, GeneratorKind, Language, PlannerConfig, ReportView, Result, RunReport,
    SearchKind, Secrets,
};
use sp_storage::FileCache;

use crate::manager::PlannerManager;
use crate::search::available_providers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum PlannerCommands {
    /// Build a content plan for a keyword phrase
    Plan(PlanArgs),
    /// List the available search providers
    Providers,
    /// Remove every entry from the on-disk response cache
    ClearCache {
        #[arg(long, env = "SEO_PLANNER_CACHE_DIR", default_value = ".seo-planner-cache")]
        cache_dir: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Keyword phrase to research
    pub keyword: String,

    #[arg(long, env = "SEO_PLANNER_SEARCH", value_enum, default_value_t)]
    pub search_provider: SearchKind,

    #[arg(long, env = "SEO_PLANNER_FETCHER", value_enum, default_value_t)]
    pub fetcher: FetcherKind,

    #[arg(long, env = "SEO_PLANNER_GENERATOR", value_enum, default_value_t)]
    pub generator: GeneratorKind,

    /// Model name override for the generator
    #[arg(long, env = "SEO_PLANNER_MODEL")]
    pub model: Option<String>,

    /// Base URL for an OpenAI-compatible endpoint
    #[arg(long, env = "SEO_PLANNER_MODEL_URL")]
    pub model_url: Option<String>,

    /// Language of the search locale and the report
    #[arg(long, env = "SEO_PLANNER_LANGUAGE", value_enum, default_value_t)]
    pub language: Language,

    /// Number of search results to analyse
    #[arg(long, default_value_t = 10)]
    pub results: usize,

    /// Pages fetched at the same time
    #[arg(long, env = "SEO_PLANNER_CONCURRENCY", default_value_t = 5)]
    pub concurrency: usize,

    /// Pages with this many characters or fewer are skipped
    #[arg(long, default_value_t = 100)]
    pub min_content_length: usize,

    /// Extra blocked domain fragment, may be repeated
    #[arg(long = "block")]
    pub block: Vec<String>,

    /// Start from an empty blocklist instead of the built-in one
    #[arg(long)]
    pub no_default_blocklist: bool,

    /// Annotate suggested keywords with monthly search volume
    #[arg(long)]
    pub volumes: bool,

    #[arg(long, env = "SEO_PLANNER_CACHE", value_enum, default_value_t)]
    pub cache: CacheKind,

    #[arg(long, env = "SEO_PLANNER_CACHE_DIR", default_value = ".seo-planner-cache")]
    pub cache_dir: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl PlanArgs {
    pub fn to_config(&self, secrets: Secrets) -> PlannerConfig {
        let mut config = PlannerConfig {
            search: self.search_provider,
            fetcher: self.fetcher,
            generator: self.generator,
            model: self.model.clone(),
            model_url: self.model_url.clone(),
            language: self.language,
            results: self.results,
            concurrency: self.concurrency,
            min_content_length: self.min_content_length,
            enrich_volumes: self.volumes,
            cache: self.cache,
            cache_dir: self.cache_dir.clone(),
            secrets,
            ..Default::default()
        };
        if self.no_default_blocklist {
            config.blocklist.clear();
        }
        config.blocklist.extend(self.block.iter().cloned());
        config
    }
}

pub fn render_markdown(report: &RunReport) -> String {
    let mut out = format!(
        "# {}\n\n_{} · {} sources analysed, {} skipped, {} blocked, {} words on average_\n\n",
        report.keyword,
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.sources.len(),
        report.skipped,
        report.filtered,
        report.average_word_count
    );
    match &report.view {
        ReportView::Sections(panels) => {
            let rendered: Vec<String> = panels
                .iter()
                .enumerate()
                .map(|(i, p)| render_section(i + 1, &p.title, &p.body))
                .collect();
            out.push_str(&rendered.join("\n\n"));
        }
        ReportView::Raw(raw) => out.push_str(raw.trim()),
    }
    out.push('\n');
    out
}

pub fn render_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(report)),
        OutputFormat::Json => render_json(report),
    }
}

pub async fn handle_command(command: PlannerCommands, secrets: Secrets) -> Result<()> {
    match command {
        PlannerCommands::Plan(args) => {
            let config = args.to_config(secrets);
            let manager = PlannerManager::from_config(&config).await?;
            let report = manager.run(&args.keyword).await?;
            let rendered = render(&report, args.format)?;
            match &args.output {
                Some(path) => {
                    tokio::fs::write(path, rendered).await?;
                    tracing::info!("💾 Report written to {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }
        PlannerCommands::Providers => {
            println!("Available search providers:");
            for (name, description) in available_providers() {
                println!("  {:<12} {}", name, description);
            }
        }
        PlannerCommands::ClearCache { cache_dir } => {
            if !cache_dir.exists() {
                println!("No cache at {}", cache_dir.display());
                return Ok(());
            }
            FileCache::new(&cache_dir).await?.clear().await?;
            println!("🧹 Cleared cache at {}", cache_dir.display());
        }
    }
    Ok(())
}
