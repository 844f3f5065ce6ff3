pub mod models;
pub mod prompt;

pub use models::create_generator;
pub use prompt::build_prompt;

pub mod prelude {
    pub use super::models::{create_generator, DummyGenerator, GeminiGenerator, OpenAiGenerator};
    pub use sp_core::{Error, ReportGenerator, Result};
}
