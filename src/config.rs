use crate::discovery::Shard;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MAX_CHARS: usize = 6000;
pub const DEFAULT_TARGET_LANGUAGE: &str = "Chinese";

#[derive(Debug, Clone)]
pub struct Config {
    // Chat completion API
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_api_key: String,
    pub request_timeout: Duration,

    // Pacing
    pub max_chars: usize,
    pub call_delay: Duration,

    // Files
    pub docs_dir: PathBuf,
    pub out_dir: PathBuf,
    pub shard: Shard,

    // Prompt
    pub target_language: String,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// This is the only place the crate reads environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let openai_base_url = required("OPENAI_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let openai_model = required("OPENAI_MODEL")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let max_chars: usize = parse_or(&lookup, "MAX_CHARS", DEFAULT_MAX_CHARS)?;
        if max_chars == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_CHARS",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let call_delay = seconds_or(&lookup, "SLEEP_SECONDS", 1.0)?;
        let request_timeout = Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT", 60u64)?);

        let shard_index: usize = parse_or(&lookup, "SHARD_INDEX", 0)?;
        let shard_total: usize = parse_or(&lookup, "SHARD_TOTAL", 1)?;
        let shard = Shard::new(shard_index, shard_total)?;

        Ok(Self {
            openai_base_url,
            openai_model,
            openai_api_key,
            request_timeout,
            max_chars,
            call_delay,
            docs_dir: lookup("DOCS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("docs")),
            out_dir: lookup("OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("translated")),
            shard,
            target_language: lookup("TARGET_LANGUAGE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string()),
        })
    }

    /// Full URL of the chat completion endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.openai_base_url)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn seconds_or<F>(lookup: &F, name: &'static str, default: f64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: f64 = parse_or(lookup, name, default)?;
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::Invalid {
        name,
        value: secs.to_string(),
        reason: e.to_string(),
    })
}
