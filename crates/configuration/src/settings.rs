use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; omitted values fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub generator: GeneratorSettings,
    pub rolling: RollingSettings,
    pub leaderboard: LeaderboardSettings,
    pub logging: LoggingSettings,
}

/// Where the three input documents live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub directory: PathBuf,
    pub strategies_file: String,
    pub performance_file: String,
    pub changelog_file: String,
}

impl DataSettings {
    pub fn strategies_path(&self) -> PathBuf {
        self.directory.join(&self.strategies_file)
    }

    pub fn performance_path(&self) -> PathBuf {
        self.directory.join(&self.performance_file)
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.directory.join(&self.changelog_file)
    }
}

/// Fallback parameters for synthesized series.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Number of daily points in a synthesized series.
    pub days: usize,
    /// Used when a strategy has no (or a zero) seed hint.
    pub default_seed: i64,
    /// Annualized drift, e.g. 0.12 for 12%.
    pub default_trend: f64,
    /// Annualized volatility, e.g. 0.16 for 16%.
    pub default_vol: f64,
    /// The day synthesized dates count back from. Today (UTC) when unset.
    pub anchor_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RollingSettings {
    /// Trailing window length, in returns.
    pub window: usize,
}

/// Ranking policy for leaderboards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    /// Strategies with fewer (proxy) trades are dropped when the threshold filter is on.
    pub min_trades: u32,
    pub top: usize,
    pub default_window: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
}

/// How the CLI prints results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

// --- Default Implementations ---

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            strategies_file: "strategies.json".to_string(),
            performance_file: "performance.json".to_string(),
            changelog_file: "changelog.json".to_string(),
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            days: 1260,
            default_seed: 1000,
            default_trend: 0.12,
            default_vol: 0.16,
            anchor_date: None,
        }
    }
}

impl Default for RollingSettings {
    fn default() -> Self {
        Self { window: 252 }
    }
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            min_trades: 20,
            top: 10,
            default_window: "1Y".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
