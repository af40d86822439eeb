use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Every constant the prediction engine uses. Defaults reproduce the
/// published model exactly.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Matches considered per player, most recent first.
    pub max_history: usize,
    /// How many of the most recent matches get `recent_weight`.
    pub recent_count: usize,
    pub recent_weight: f64,
    pub base_weight: f64,
    /// Weighted mean used for a player with no history at all.
    pub empty_history_mean: f64,
    /// Average dispersion that drives raw confidence to zero.
    pub dispersion_scale: f64,
    pub confidence_floor: f64,
    pub confidence_ceiling: f64,
    pub interval_half_width: f64,
    pub interval_floor: f64,
    pub interval_ceiling: f64,
    pub verdict: VerdictPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: 10,
            recent_count: 3,
            recent_weight: 1.6,
            base_weight: 1.0,
            empty_history_mean: 76.0,
            dispersion_scale: 20.0,
            confidence_floor: 0.4,
            confidence_ceiling: 0.9,
            interval_half_width: 8.0,
            interval_floor: 60.0,
            interval_ceiling: 120.0,
            verdict: VerdictPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Reject policies that would break the output invariants.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("recent_weight", self.recent_weight),
            ("base_weight", self.base_weight),
            ("empty_history_mean", self.empty_history_mean),
            ("dispersion_scale", self.dispersion_scale),
            ("confidence_floor", self.confidence_floor),
            ("confidence_ceiling", self.confidence_ceiling),
            ("interval_half_width", self.interval_half_width),
            ("interval_floor", self.interval_floor),
            ("interval_ceiling", self.interval_ceiling),
        ];
        for (name, value) in fields {
            anyhow::ensure!(value.is_finite(), "engine.{} must be finite, got {}", name, value);
        }
        anyhow::ensure!(self.max_history > 0, "engine.max_history must be at least 1");
        anyhow::ensure!(
            self.recent_weight > 0.0 && self.base_weight > 0.0,
            "engine weights must be positive (recent={}, base={})",
            self.recent_weight,
            self.base_weight
        );
        anyhow::ensure!(
            self.dispersion_scale > 0.0,
            "engine.dispersion_scale must be positive, got {}",
            self.dispersion_scale
        );
        anyhow::ensure!(
            self.confidence_floor <= self.confidence_ceiling,
            "confidence floor {} is above ceiling {}",
            self.confidence_floor,
            self.confidence_ceiling
        );
        anyhow::ensure!(
            self.interval_floor <= self.interval_ceiling,
            "interval floor {} is above ceiling {}",
            self.interval_floor,
            self.interval_ceiling
        );
        anyhow::ensure!(
            self.interval_half_width >= 0.0,
            "engine.interval_half_width must not be negative"
        );
        self.verdict.validate()
    }
}

/// Classification bands around the betting line. Estimates strictly between
/// the two bands fall in the no-call zone.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VerdictPolicy {
    pub line: f64,
    pub over_at_or_above: i64,
    pub under_at_or_below: i64,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            line: 74.5,
            over_at_or_above: 78,
            under_at_or_below: 72,
        }
    }
}

impl VerdictPolicy {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.line.is_finite(), "verdict line must be finite, got {}", self.line);
        anyhow::ensure!(
            self.under_at_or_below < self.over_at_or_above,
            "verdict bands overlap: under <= {} and over >= {}",
            self.under_at_or_below,
            self.over_at_or_above
        );
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// Empty means "use the bundled local file".
    pub api_url: String,
    pub local_path: String,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
    /// Serve the local file when every HTTP attempt failed.
    pub fallback_to_local: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            local_path: "assets/sample_matches.json".to_string(),
            request_timeout_ms: 5000,
            max_retries: 2,
            fallback_to_local: true,
        }
    }
}

impl FeedConfig {
    /// `TT_API_URL` wins over the configured URL when set and non-empty.
    pub fn effective_api_url(&self) -> String {
        match std::env::var("TT_API_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.api_url.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber` env-filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tt_predictor=info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.engine.validate().context("invalid [engine] section")?;
        Ok(config)
    }

    /// Defaults apply when the file does not exist; a file that exists but
    /// does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for (key, value) in parse_env_lines(content) {
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(content: &str) -> Vec<(&str, &str)> {
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim().trim_matches('"').trim_matches('\'')))
        .collect()
}
