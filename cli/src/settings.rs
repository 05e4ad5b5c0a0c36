use anyhow::{Result, anyhow, bail};
use client::config::{ClientConfig, DEFAULT_MODEL_ID, OPENAI_API_BASE};
use config::{Config, ConfigBuilder, ConfigError, File, builder::DefaultState};
use lookup::WORLD_TIME_API_BASE;
use request::ApiStyle;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::info;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ENV_PREFIX: &str = "WHATTIME_";

const KEYS: [&str; 5] = [
    "api_base",
    "api_style",
    "lookup_base",
    "model",
    "request_timeout_secs",
];

pub struct Settings {
    pub api_base: String,
    pub api_key: String,
    pub api_style: ApiStyle,
    pub lookup_base: String,
    pub model: String,
    pub request_timeout: Option<Duration>,
}

/// Loads `.env` into the process environment, then reads `config.*` with
/// environment overrides on top.
pub fn load() -> Result<Settings> {
    dotenvy::dotenv().ok();

    from_sources(
        Config::builder().add_source(File::with_name("config").required(false)),
        std::env::vars(),
    )
}

/// Only `OPENAI_API_KEY` and `WHATTIME_`-prefixed documented keys are taken
/// from `vars`; everything else in the environment is ignored.
pub fn from_sources(
    builder: ConfigBuilder<DefaultState>,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Settings> {
    let mut builder = builder;
    for (name, value) in vars {
        if name == API_KEY_VAR {
            builder = builder.set_override("openai_api_key", value)?;
        } else if let Some(key) = name.strip_prefix(ENV_PREFIX) {
            let key = key.to_ascii_lowercase();
            if KEYS.contains(&key.as_str()) {
                builder = builder.set_override(key, value)?;
            }
        }
    }
    let settings = builder.build()?;

    let api_key: String = get(&settings, "openai_api_key")?.unwrap_or_default();
    if api_key.trim().is_empty() {
        bail!("OPENAI_API_KEY is not set; export it or add it to a .env file");
    }

    let api_style = match get::<String>(&settings, "api_style")? {
        Some(style) => style.parse()?,
        None => ApiStyle::default(),
    };

    let settings = Settings {
        api_base: get(&settings, "api_base")?.unwrap_or_else(|| OPENAI_API_BASE.to_string()),
        api_key,
        api_style,
        lookup_base: get(&settings, "lookup_base")?
            .unwrap_or_else(|| WORLD_TIME_API_BASE.to_string()),
        model: get(&settings, "model")?.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        request_timeout: get::<u64>(&settings, "request_timeout_secs")?.map(Duration::from_secs),
    };

    info!(
        "Settings loaded - model: {}, api_style: {:?}, api_base: {}, lookup_base: {}",
        settings.model, settings.api_style, settings.api_base, settings.lookup_base
    );

    Ok(settings)
}

// Absent keys are `None`; present keys that fail to parse are errors.
fn get<T: DeserializeOwned>(settings: &Config, key: &str) -> Result<Option<T>> {
    match settings.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(anyhow!("Invalid value for setting '{}': {}", key, e)),
    }
}

impl Settings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            api_style: self.api_style,
            max_tokens: None,
            model_id: self.model.clone(),
            request_timeout: self.request_timeout,
            temperature: None,
        }
    }
}
