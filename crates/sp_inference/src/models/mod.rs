use std::sync::Arc;

use sp_core::config::require;
use sp_core::{GeneratorKind, PlannerConfig, ReportGenerator, Result, Secrets};

pub mod dummy;
pub mod gemini;
pub mod openai;

pub use dummy::DummyGenerator;
pub use gemini::GeminiGenerator;
pub use openai::OpenAiGenerator;

/// Builds the report generator selected in the configuration.
pub fn create_generator(config: &PlannerConfig) -> Result<Arc<dyn ReportGenerator>> {
    let generator: Arc<dyn ReportGenerator> = match config.generator {
        GeneratorKind::Gemini => Arc::new(GeminiGenerator::new(
            require(&config.secrets.gemini_api_key, Secrets::GEMINI_API_KEY)?,
            config.model.clone(),
            config.language,
            config.generation_timeout,
        )?),
        GeneratorKind::Openai => Arc::new(OpenAiGenerator::new(
            require(&config.secrets.openai_api_key, Secrets::OPENAI_API_KEY)?,
            config.model.clone(),
            config.model_url.clone(),
            config.language,
            config.generation_timeout,
        )?),
        GeneratorKind::Dummy => Arc::new(DummyGenerator::new(config.language)),
    };
    tracing::info!("🧠 Report generator initialized (using {})", generator.name());
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_core::Error;

    #[test]
    fn test_missing_key_is_config_error() {
        let config = PlannerConfig::default();
        assert!(matches!(create_generator(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_dummy_needs_no_secrets() {
        let config = PlannerConfig {
            generator: GeneratorKind::Dummy,
            ..Default::default()
        };
        assert_eq!(create_generator(&config).unwrap().name(), "dummy:pl");
    }
}
