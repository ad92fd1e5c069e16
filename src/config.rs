//! Конфигурация бота: YAML-файл с дефолтами + переменные окружения
//! Ключи API берутся из `.env` / окружения (API_KEY, API_SECRET)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::exchange::TESTNET_BASE_URL;
use crate::order::{normalizer, NormalizerConfig, DEFAULT_STEP_SIZE};

pub const DEFAULT_CONFIG_PATH: &str = "config/bot.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Missing environment variable {0} (add it to .env)")]
    MissingEnv(&'static str),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory with index.html and the frontend assets
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("frontend"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    pub base_url: String,
    pub quote_asset: String,
    pub min_quantity: Decimal,
    pub quantity_precision: u32,
    pub price_precision: u32,
    pub default_step_size: Decimal,
    /// Orders are refused when the available quote balance is below this
    pub min_balance: Decimal,
    pub leverage: u32,
    pub recv_window_ms: u64,
    pub log_file: Option<PathBuf>,
    pub server: ServerSettings,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            base_url: TESTNET_BASE_URL.to_string(),
            quote_asset: normalizer::DEFAULT_QUOTE_SUFFIX.to_string(),
            min_quantity: normalizer::DEFAULT_MIN_QUANTITY,
            quantity_precision: normalizer::DEFAULT_QUANTITY_PRECISION,
            price_precision: normalizer::DEFAULT_PRICE_PRECISION,
            default_step_size: DEFAULT_STEP_SIZE,
            min_balance: dec!(10),
            leverage: 1,
            recv_window_ms: 5000,
            log_file: Some(PathBuf::from("bot.log")),
            server: ServerSettings::default(),
        }
    }
}

impl BotSettings {
    /// Loads settings from `path`, or from `config/bot.yaml` when it exists, or defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        let settings = settings.with_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("BINANCE_FUTURES_URL") {
            self.base_url = url;
        }
        if let Ok(file) = std::env::var("BOT_LOG_FILE") {
            self.log_file = (!file.is_empty()).then(|| PathBuf::from(file));
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quote_asset.is_empty() {
            return Err(ConfigError::Invalid("quote_asset must not be empty".into()));
        }
        if self.min_quantity <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "min_quantity must be positive, got {}",
                self.min_quantity
            )));
        }
        if self.default_step_size <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "default_step_size must be positive, got {}",
                self.default_step_size
            )));
        }
        if self.min_balance < Decimal::ZERO {
            return Err(ConfigError::Invalid("min_balance must not be negative".into()));
        }
        if self.leverage == 0 || self.leverage > 125 {
            return Err(ConfigError::Invalid(format!(
                "leverage must be between 1 and 125, got {}",
                self.leverage
            )));
        }
        Ok(())
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            quote_suffix: self.quote_asset.clone(),
            min_quantity: self.min_quantity,
            quantity_precision: self.quantity_precision,
            price_precision: self.price_precision,
        }
    }
}

/// API key pair. The secret never shows up in Debug output.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Reads API_KEY / API_SECRET, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = read_env("API_KEY")?;
        let api_secret = read_env("API_SECRET")?;
        Ok(Self { api_key, api_secret })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

fn read_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}
