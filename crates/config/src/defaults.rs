use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Fixed key the comparison list is stored under
pub const COMPARISON_STORAGE_KEY: &str = "comparisonStrategies";

pub fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub fn default_storage_key() -> String {
    COMPARISON_STORAGE_KEY.to_string()
}

pub fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".optlab")
}

pub fn default_price_range_pct() -> f64 {
    0.15
}

pub fn default_num_points() -> u32 {
    100
}

pub fn default_zoom() -> f64 {
    1.0
}

pub fn default_chart_width() -> usize {
    72
}

pub fn default_chart_height() -> usize {
    16
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_log_level() -> String {
    "warn".to_string()
}
