use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Bounds for the local report window, in days.
pub const MIN_WINDOW_DAYS: i64 = 30;
pub const MAX_WINDOW_DAYS: i64 = 365;

// Default value functions for serde
fn default_window_days() -> i64 {
    90
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3:8b".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Local report window in days; values outside
    /// [MIN_WINDOW_DAYS, MAX_WINDOW_DAYS] are clamped at use
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Remote classifier endpoint configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Output token budget passed to the endpoint
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout; the call has no other cancellation path
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load config from file path (YAML format)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to load config from {}, using defaults", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// The report window with bounds applied.
    pub fn clamped_window(&self) -> i64 {
        self.window_days.clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS)
    }
}
