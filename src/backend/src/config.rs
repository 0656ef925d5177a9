use anyhow::{Context, Result, ensure};
use std::{env, sync::OnceLock, time::Duration};

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server configuration
    pub ui: UiConfig,

    /// Brew profiles and countdown pacing
    pub brewer: BrewerConfig,

    /// Settings of the `coffee-panel` terminal client
    pub panel: PanelConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub port: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BrewerConfig {
    /// Brew durations in minutes, in mode order
    pub profiles: Vec<u32>,
    pub tick_interval: Duration,
}

#[derive(Clone, Debug)]
pub struct PanelConfig {
    pub device_url: String,
    pub poll_interval: Duration,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// Returns a reference to the cached configuration. On first call, it loads
    /// and validates all configuration from environment variables. Subsequent
    /// calls return the cached instance.
    ///
    /// # Panics
    /// Panics if configuration loading fails. This is intentional as the
    /// application cannot function without valid configuration.
    pub fn get() -> &'static Self {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        APP_CONFIG.get_or_init(|| {
            Self::load_internal().expect("failed to load application configuration")
        })
    }

    fn load_internal() -> Result<Self> {
        let ui = UiConfig::load()?;
        let brewer = BrewerConfig::load()?;
        let panel = PanelConfig::load()?;

        Ok(Self { ui, brewer, panel })
    }
}

impl UiConfig {
    fn load() -> Result<Self> {
        let port = env::var("UI_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("failed to parse UI_PORT: invalid format")?;

        Ok(Self { port })
    }
}

impl Default for BrewerConfig {
    fn default() -> Self {
        Self {
            profiles: vec![5, 10, 15],
            tick_interval: Duration::from_millis(1000),
        }
    }
}

impl BrewerConfig {
    fn load() -> Result<Self> {
        let profiles = match env::var("BREW_PROFILES") {
            Ok(value) => Self::parse_profiles(&value)?,
            Err(_) => Self::default().profiles,
        };

        let tick_ms = env::var("BREW_TICK_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .context("failed to parse BREW_TICK_MS: invalid format")?;

        ensure!(tick_ms > 0, "BREW_TICK_MS must be greater than 0");

        Ok(Self {
            profiles,
            tick_interval: Duration::from_millis(tick_ms),
        })
    }

    /// Parse a comma separated list of brew durations in minutes
    pub fn parse_profiles(value: &str) -> Result<Vec<u32>> {
        let profiles = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .parse::<u32>()
                    .with_context(|| format!("failed to parse BREW_PROFILES entry {entry:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        ensure!(!profiles.is_empty(), "BREW_PROFILES must not be empty");
        ensure!(
            profiles.iter().all(|minutes| *minutes > 0),
            "BREW_PROFILES entries must be greater than 0"
        );

        Ok(profiles)
    }
}

impl PanelConfig {
    fn load() -> Result<Self> {
        let device_url =
            env::var("DEVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        ensure!(
            device_url.starts_with("http://") || device_url.starts_with("https://"),
            "failed to parse DEVICE_URL: expected an http(s) URL, got {device_url}"
        );

        Ok(Self {
            device_url: device_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(smarter_coffee_core::POLL_INTERVAL_MS),
        })
    }
}
