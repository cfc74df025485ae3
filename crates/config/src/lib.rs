use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level workbench configuration (`optlab.yaml`)
///
/// Every section is optional in the file; missing sections take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkbenchConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub payoff: PayoffConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(rename = "base_url")]
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; unset means requests may wait indefinitely
    #[serde(rename = "timeout_seconds")]
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

/// Where the comparison list is persisted
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the comparison file; defaults to `~/.optlab`
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(rename = "storage_key")]
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            storage_key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Configured directory, or the per-user default
    pub fn resolve_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(default_storage_dir)
    }

    /// Full path of the comparison file
    pub fn comparison_path(&self) -> PathBuf {
        self.resolve_directory()
            .join(format!("{}.json", self.storage_key))
    }
}

/// How two payoff series are lined up row by row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Pair the i-th point of every series
    Index,
    /// Interpolate every series onto the base series' prices
    #[default]
    Price,
}

/// Payoff request window and merge settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PayoffConfig {
    /// Half-width of the price window as a fraction of the underlying price
    #[serde(rename = "price_range_pct")]
    #[serde(default = "default_price_range_pct")]
    pub price_range_pct: f64,
    #[serde(rename = "num_points")]
    #[serde(default = "default_num_points")]
    pub num_points: u32,
    #[serde(default)]
    pub alignment: AlignmentMode,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            price_range_pct: default_price_range_pct(),
            num_points: default_num_points(),
            alignment: AlignmentMode::default(),
        }
    }
}

/// How duplicates are detected when adding to the comparison list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupMode {
    /// Same definition, asset and leg set
    #[default]
    Identity,
    /// Full structural equality, timestamp included
    Exact,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ComparisonConfig {
    #[serde(default)]
    pub dedup: DedupMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    #[default]
    Area,
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTab {
    #[default]
    Graph,
    Table,
}

/// Default rendering choices; CLI flags override them per command
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub chart: ChartStyle,
    #[serde(default)]
    pub tab: DisplayTab,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(rename = "chart_width")]
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
    #[serde(rename = "chart_height")]
    #[serde(default = "default_chart_height")]
    pub chart_height: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart: ChartStyle::default(),
            tab: DisplayTab::default(),
            zoom: default_zoom(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}
