use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

use crate::chart::Theme;
use crate::indicator::IndicatorPeriods;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const API_URL_ENV: &str = "DASHBOARD_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub default_coin: String,
    #[serde(default)]
    pub coins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorConfig {
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        let p = IndicatorPeriods::default();
        Self {
            sma_period: p.sma,
            ema_period: p.ema,
            rsi_period: p.rsi,
        }
    }
}

impl IndicatorConfig {
    pub fn periods(&self) -> IndicatorPeriods {
        IndicatorPeriods {
            sma: self.sma_period,
            ema: self.ema_period,
            rsi: self.rsi_period,
        }
    }
}

impl ApiConfig {
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .with_context(|| format!("invalid api.base_url '{}'", self.base_url))?;
        if url.cannot_be_a_base() {
            bail!("invalid api.base_url '{}': not a base URL", self.base_url);
        }
        Ok(url)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DashboardConfig {
    /// Coins to offer in the selector, default coin first, deduplicated.
    pub fn coin_list(&self) -> Vec<String> {
        let mut out = Vec::new();
        let primary = self.default_coin.trim().to_ascii_lowercase();
        if !primary.is_empty() {
            out.push(primary);
        }
        for coin in &self.coins {
            let c = coin.trim().to_ascii_lowercase();
            if !c.is_empty() && !out.iter().any(|v| v == &c) {
                out.push(c);
            }
        }
        out
    }
}

impl UiConfig {
    pub fn theme(&self) -> Result<Theme> {
        Theme::parse(&self.theme).with_context(|| {
            format!("invalid ui.theme '{}': expected 'light' or 'dark'", self.theme)
        })
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::parse(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn parse(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.api.url()?;
        if self.api.refresh_interval_secs == 0 {
            bail!("api.refresh_interval_secs must be > 0");
        }
        if self.api.request_timeout_secs == 0 {
            bail!("api.request_timeout_secs must be > 0");
        }
        if self.ui.refresh_rate_ms == 0 {
            bail!("ui.refresh_rate_ms must be > 0");
        }
        if self.dashboard.coin_list().is_empty() {
            bail!("dashboard.default_coin must not be empty");
        }
        let p = self.indicators.periods();
        if p.sma == 0 || p.ema == 0 || p.rsi == 0 {
            bail!("indicator periods must be > 0");
        }
        self.ui.theme()?;
        Ok(())
    }
}
