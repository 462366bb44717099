//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use intent_router::{DEFAULT_ADD_PHRASES, DEFAULT_REMOVE_PHRASES, DEFAULT_TRIGGER_WORD};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,

    /// Authorized numbers
    #[serde(default)]
    pub auth: AuthConfig,

    /// AI chat configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Trigger word and admin phrases
    #[serde(default)]
    pub router: RouterSettings,

    /// WhatsApp bridge configuration
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Price and news providers
    #[serde(default)]
    pub market: MarketConfig,

    /// Background broadcasts
    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name used as log prefix
    #[serde(default = "default_bot_name")]
    pub name: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Only answer messages sent in group chats
    #[serde(default)]
    pub restrict_to_group: bool,

    /// How long in-flight dispatches may run after shutdown starts
    #[serde(default = "default_shutdown_grace", with = "humantime_serde")]
    pub shutdown_grace: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Comma-separated numbers that can never be removed at runtime
    #[serde(default, deserialize_with = "comma_separated")]
    pub fixed_numbers: Vec<String>,

    /// JSON file holding numbers added at runtime
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_ai_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_ai_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterSettings {
    #[serde(default = "default_trigger_word")]
    pub trigger_word: String,

    #[serde(
        default = "default_add_phrases",
        deserialize_with = "comma_separated"
    )]
    pub add_phrases: Vec<String>,

    #[serde(
        default = "default_remove_phrases",
        deserialize_with = "comma_separated"
    )]
    pub remove_phrases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// WhatsApp REST bridge endpoint
    #[serde(default = "default_whatsapp_service")]
    pub service_url: String,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Pause after a failed receive before polling again
    #[serde(default = "default_error_backoff", with = "humantime_serde")]
    pub error_backoff: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_coingecko_url")]
    pub coingecko_url: String,

    #[serde(default = "default_cryptopanic_url")]
    pub cryptopanic_url: String,

    #[serde(default)]
    pub cryptopanic_token: Option<SecretString>,

    #[serde(default = "default_market_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Send the news digest to every authorized number once a day
    #[serde(default = "default_true")]
    pub news_enabled: bool,

    /// Local wall-clock time of the daily digest, `HH:MM`
    #[serde(default = "default_news_time", deserialize_with = "wall_clock")]
    pub news_time: NaiveTime,

    /// Alert authorized numbers when a coin breaks its all-time high
    #[serde(default = "default_true")]
    pub ath_enabled: bool,

    #[serde(default = "default_ath_interval", with = "humantime_serde")]
    pub ath_interval: Duration,

    #[serde(default = "default_ath_coins", deserialize_with = "comma_separated")]
    pub ath_coins: Vec<String>,

    /// JSON file with the highest price alerted per coin
    #[serde(default = "default_ath_records_path")]
    pub ath_records_path: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            restrict_to_group: false,
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            fixed_numbers: Vec::new(),
            store_path: default_store_path(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            api_key: None,
            base_url: default_ai_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout: default_ai_timeout(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            trigger_word: default_trigger_word(),
            add_phrases: default_add_phrases(),
            remove_phrases: default_remove_phrases(),
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            service_url: default_whatsapp_service(),
            poll_interval: default_poll_interval(),
            error_backoff: default_error_backoff(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            coingecko_url: default_coingecko_url(),
            cryptopanic_url: default_cryptopanic_url(),
            cryptopanic_token: None,
            timeout: default_market_timeout(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            news_enabled: true,
            news_time: default_news_time(),
            ath_enabled: true,
            ath_interval: default_ath_interval(),
            ath_coins: default_ath_coins(),
            ath_records_path: default_ath_records_path(),
        }
    }
}

impl AiConfig {
    /// The API key, if one was configured and is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.trim().is_empty())
    }

    /// AI chat runs only when enabled and a key is present.
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key().is_some()
    }
}

fn default_bot_name() -> String {
    "FayskBot".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

fn default_shutdown_grace() -> Duration {
    Duration::from_secs(10)
}

fn default_store_path() -> PathBuf {
    PathBuf::from("authorized.json")
}

fn default_true() -> bool {
    true
}

fn default_ai_url() -> String {
    openai_client::DEFAULT_BASE_URL.into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

fn default_max_tokens() -> u32 {
    400
}

fn default_temperature() -> f32 {
    0.7
}

fn default_ai_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_system_prompt() -> String {
    "Você é um assistente prestativo em um grupo de WhatsApp. \
     Responda em português, de forma curta e direta, com formatação compatível com WhatsApp."
        .into()
}

fn default_trigger_word() -> String {
    DEFAULT_TRIGGER_WORD.into()
}

fn default_add_phrases() -> Vec<String> {
    DEFAULT_ADD_PHRASES.iter().map(|s| s.to_string()).collect()
}

fn default_remove_phrases() -> Vec<String> {
    DEFAULT_REMOVE_PHRASES.iter().map(|s| s.to_string()).collect()
}

fn default_whatsapp_service() -> String {
    "http://whatsapp-bridge:8080".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_error_backoff() -> Duration {
    Duration::from_secs(5)
}

fn default_news_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

fn default_ath_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_ath_coins() -> Vec<String> {
    ["BTC", "ETH", "USDT", "XRP", "SOL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ath_records_path() -> PathBuf {
    PathBuf::from("crypto_records.json")
}

fn default_coingecko_url() -> String {
    market_data::DEFAULT_COINGECKO_URL.into()
}

fn default_cryptopanic_url() -> String {
    market_data::DEFAULT_CRYPTOPANIC_URL.into()
}

fn default_market_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Split a comma-separated list, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(split_list(&raw))
}

fn wall_clock<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| serde::de::Error::custom(format!("invalid time {:?}: {}", raw, e)))
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_source(None)
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment.
    pub fn from_source(vars: Option<HashMap<String, String>>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Keep phone numbers as strings.
                    .try_parsing(false)
                    .source(vars),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Log the loaded configuration without secrets.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  bot name:          {}", self.bot.name);
        info!("  log level:         {}", self.bot.log_level);
        info!("  restrict to group: {}", self.bot.restrict_to_group);
        info!("  fixed numbers:     {:?}", self.auth.fixed_numbers);
        info!("  store path:        {}", self.auth.store_path.display());
        info!("  whatsapp bridge:   {}", self.whatsapp.service_url);
        info!("  trigger word:      {}", self.router.trigger_word);
        info!(
            "  daily news:        {}",
            if self.jobs.news_enabled {
                self.jobs.news_time.format("%H:%M").to_string()
            } else {
                "off".into()
            }
        );
        info!(
            "  ATH monitor:       {}",
            if self.jobs.ath_enabled {
                format!(
                    "every {:?} for {}",
                    self.jobs.ath_interval,
                    self.jobs.ath_coins.join(",")
                )
            } else {
                "off".into()
            }
        );

        if self.ai.is_active() {
            info!(
                "  AI: enabled (model={}, max_tokens={}, temperature={:.2})",
                self.ai.model, self.ai.max_tokens, self.ai.temperature
            );
        } else if self.ai.enabled {
            warn!("  AI: disabled, AI__API_KEY is missing");
        } else {
            info!("  AI: disabled via AI__ENABLED=false");
        }

        if self.market.cryptopanic_token.is_none() {
            warn!("  news: MARKET__CRYPTOPANIC_TOKEN is missing, !cryptonews will fail");
        }
    }
}
