use crate::error::ConfigError;

const DEFAULT_MODEL: &str = "gpt-4.1";
const DEFAULT_MAX_STEPS: usize = 20;
const DEFAULT_TRANSCRIPT_LIMIT: usize = 200;
const DEFAULT_WEATHER_URL: &str = "https://wttr.in";

#[derive(Debug, Clone)]
pub struct LooperConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    /// Interpreter iterations allowed per user query.
    pub max_steps: usize,
    /// Non-system transcript entries kept before the oldest are evicted.
    pub transcript_limit: usize,
    pub weather_url: String,
}

impl LooperConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        Ok(LooperConfig {
            api_key,
            api_base: non_empty("OPENAI_BASE_URL"),
            model: non_empty("LOOPER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_steps: positive(
                "LOOPER_MAX_STEPS",
                non_empty("LOOPER_MAX_STEPS"),
                DEFAULT_MAX_STEPS,
            )?,
            transcript_limit: positive(
                "LOOPER_TRANSCRIPT_LIMIT",
                non_empty("LOOPER_TRANSCRIPT_LIMIT"),
                DEFAULT_TRANSCRIPT_LIMIT,
            )?,
            weather_url: non_empty("LOOPER_WEATHER_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
        })
    }
}

fn positive(name: &'static str, value: Option<String>, default: usize) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}
