pub mod cli;
pub mod content;
mod http;
pub mod logging;
pub mod manager;
pub mod search;
pub mod volume;

pub use manager::PlannerManager;

pub use cli::{handle_command, OutputFormat, PlanArgs, PlannerCommands};
pub use content::create_fetcher;
pub use logging::{init_logging, Logger};
pub use search::{available_providers, create_search_provider};

pub mod prelude {
    pub use super::manager::PlannerManager;
    pub use sp_core::{ContentFetcher, Error, Result, RunReport, SearchProvider};
}
