use std::time::Duration;

use clap::Parser;
use mediko_core::DEFAULT_MAX_CHARS;
use mediko_service::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use mediko_service::GeneratorConfig;
use mediko_session::SessionLimits;

#[derive(Debug, Parser)]
#[command(name = "mediko", about = "Orientación médica guiada en la terminal")]
pub struct CliConfig {
    /// API key for the completion provider. Falls back to OPENAI_API_KEY.
    #[arg(long, env = "MEDIKO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "MEDIKO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model used for both generation stages
    #[arg(long, env = "MEDIKO_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Per-call generation timeout (seconds)
    #[arg(long, env = "MEDIKO_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// Maximum characters for the description and each answer
    #[arg(long, env = "MEDIKO_MAX_CHARS", default_value_t = DEFAULT_MAX_CHARS)]
    pub max_chars: usize,

    /// Accept the terms and conditions without prompting
    #[arg(long)]
    pub accept_terms: bool,
}

impl CliConfig {
    pub fn generator_config(&self) -> GeneratorConfig {
        let config = GeneratorConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout),
            ..GeneratorConfig::default()
        };
        match self
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_chars: self.max_chars,
        }
    }
}
