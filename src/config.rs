use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the portfolio carousel
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Carousel timing settings
    pub carousel: CarouselTimings,
    /// Portfolio content settings
    pub content: ContentConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CarouselTimings {
    /// Period of the auto-advance timer
    pub auto_advance_interval_ms: u64,
    /// Length of the crossfade between two images
    pub crossfade_ms: u64,
    /// Auto-advance suspension after a manual navigation
    pub pause_cooldown_ms: u64,
}

impl Default for CarouselTimings {
    fn default() -> Self {
        Self {
            auto_advance_interval_ms: 3000,
            crossfade_ms: 300,
            pause_cooldown_ms: 5000,
        }
    }
}

impl CarouselTimings {
    pub fn auto_advance_interval(&self) -> Duration {
        Duration::from_millis(self.auto_advance_interval_ms)
    }

    pub fn crossfade(&self) -> Duration {
        Duration::from_millis(self.crossfade_ms)
    }

    pub fn pause_cooldown(&self) -> Duration {
        Duration::from_millis(self.pause_cooldown_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auto_advance_interval_ms == 0 {
            bail!("carousel.auto_advance_interval_ms must be greater than zero");
        }
        if self.crossfade_ms == 0 {
            bail!("carousel.crossfade_ms must be greater than zero");
        }
        if self.pause_cooldown_ms == 0 {
            bail!("carousel.pause_cooldown_ms must be greater than zero");
        }
        if self.crossfade_ms >= self.auto_advance_interval_ms {
            bail!(
                "carousel.crossfade_ms ({}) must be shorter than carousel.auto_advance_interval_ms ({})",
                self.crossfade_ms,
                self.auto_advance_interval_ms
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding one `<slug>.json` document per portfolio item
    pub content_dir: String,
    /// Maximum number of fetched items kept for fallback
    pub cache_capacity: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_dir: "content/portfolio".to_string(),
            cache_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON lines instead of human readable logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl CarouselConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (portfolio-carousel.toml, .portfolio-carousel-rc)
    /// 3. Environment variables (prefixed with PORTFOLIO_CAROUSEL__)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`CarouselConfig::load`] but looks for files under `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        let toml_path = dir.join("portfolio-carousel.toml");
        if toml_path.exists() {
            builder = builder.add_source(File::from(toml_path));
        }

        let rc_path = dir.join(".portfolio-carousel-rc");
        if rc_path.exists() {
            builder = builder.add_source(File::from(rc_path).format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("PORTFOLIO_CAROUSEL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: CarouselConfig = builder.build()?.try_deserialize()?;
        loaded.carousel.validate()?;
        Ok(loaded)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<CarouselConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = CarouselConfig::load_env_file();
        CarouselConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static CarouselConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
