use crate::*;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("api.base_url '{url}' is invalid: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("api.timeout_seconds must be a positive integer")]
    InvalidTimeout,

    #[error("storage.storage_key must be a non-empty file name, got '{0}'")]
    InvalidStorageKey(String),

    #[error("payoff.price_range_pct must be between 0 and 1 (exclusive), got {0}")]
    InvalidPriceRange(f64),

    #[error("payoff.num_points must be at least 2, got {0}")]
    InvalidNumPoints(u32),

    #[error("display.zoom must be between 1.0 and 4.0, got {0}")]
    InvalidZoom(f64),

    #[error("display.{field} must be at least {min}, got {value}")]
    InvalidChartSize { field: String, min: usize, value: usize },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Environment variable placeholder left unresolved in {field}")]
    UnresolvedEnvVar { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &WorkbenchConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_api(&config.api, &mut report);
    validate_storage(&config.storage, &mut report);
    validate_payoff(&config.payoff, &mut report);
    validate_comparison(&config.comparison, &mut report);
    validate_display(&config.display, &mut report);
    validate_logging(&config.logging, &mut report);

    report
}

fn validate_api(api: &ApiConfig, report: &mut ValidationReport) {
    if has_unresolved_env_vars(&api.base_url) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: "api.base_url".to_string(),
        });
        return;
    }

    match Url::parse(&api.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                report.add_error(ValidationError::InvalidBaseUrl {
                    url: api.base_url.clone(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                });
            } else if url.scheme() == "http"
                && !matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"))
            {
                report.add_warning(
                    "api.base_url",
                    "Plain HTTP to a non-local backend; consider https",
                );
            }
        }
        Err(e) => report.add_error(ValidationError::InvalidBaseUrl {
            url: api.base_url.clone(),
            message: e.to_string(),
        }),
    }

    match api.timeout_seconds {
        Some(0) => report.add_error(ValidationError::InvalidTimeout),
        Some(_) => {}
        None => report.add_warning(
            "api.timeout_seconds",
            "No request timeout set; a hung backend keeps the command waiting",
        ),
    }
}

fn validate_storage(storage: &StorageConfig, report: &mut ValidationReport) {
    let key = storage.storage_key.trim();
    if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
        report.add_error(ValidationError::InvalidStorageKey(storage.storage_key.clone()));
    }

    if storage.directory.is_none() {
        report.add_default(
            "storage.directory",
            &default_storage_dir().display().to_string(),
        );
    }
}

fn validate_payoff(payoff: &PayoffConfig, report: &mut ValidationReport) {
    if !(payoff.price_range_pct > 0.0 && payoff.price_range_pct < 1.0) {
        report.add_error(ValidationError::InvalidPriceRange(payoff.price_range_pct));
    }

    if payoff.num_points < 2 {
        report.add_error(ValidationError::InvalidNumPoints(payoff.num_points));
    }

    if payoff.alignment == AlignmentMode::Index {
        report.add_warning(
            "payoff.alignment",
            "Index alignment pairs unrelated prices when compared payoffs use different grids",
        );
    }
}

fn validate_comparison(comparison: &ComparisonConfig, report: &mut ValidationReport) {
    if comparison.dedup == DedupMode::Exact {
        report.add_warning(
            "comparison.dedup",
            "Exact dedup treats every rebuild as new because construction timestamps differ",
        );
    }
}

fn validate_display(display: &DisplayConfig, report: &mut ValidationReport) {
    if !(1.0..=4.0).contains(&display.zoom) {
        report.add_error(ValidationError::InvalidZoom(display.zoom));
    } else if (display.zoom * 2.0).fract() != 0.0 {
        report.add_warning("display.zoom", "Zoom is snapped to the nearest 0.5 step");
    }

    if display.chart_width < 20 {
        report.add_error(ValidationError::InvalidChartSize {
            field: "chart_width".to_string(),
            min: 20,
            value: display.chart_width,
        });
    }

    if display.chart_height < 5 {
        report.add_error(ValidationError::InvalidChartSize {
            field: "chart_height".to_string(),
            min: 5,
            value: display.chart_height,
        });
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&WorkbenchConfig::default());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report
            .defaults_applied
            .iter()
            .any(|d| d.field == "storage.directory"));
        assert!(report.warnings.iter().any(|w| w.field == "api.timeout_seconds"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = WorkbenchConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        let report = validate_config(&config);
        assert!(matches!(
            report.errors.as_slice(),
            [ValidationError::InvalidBaseUrl { .. }]
        ));

        config.api.base_url = "not a url".to_string();
        assert!(!validate_config(&config).is_valid());
    }

    #[test]
    fn test_unresolved_env_var() {
        let mut config = WorkbenchConfig::default();
        config.api.base_url = "${OPTLAB_NEVER_SET}".to_string();
        let report = validate_config(&config);
        assert_eq!(
            report.errors,
            vec![ValidationError::UnresolvedEnvVar {
                field: "api.base_url".to_string()
            }]
        );
    }

    #[test]
    fn test_remote_http_warns() {
        let mut config = WorkbenchConfig::default();
        config.api.base_url = "http://pricing.example.com/api/v1".to_string();
        config.api.timeout_seconds = Some(10);
        let report = validate_config(&config);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.field == "api.base_url"));
    }

    #[test]
    fn test_payoff_bounds() {
        let mut config = WorkbenchConfig::default();
        config.payoff.price_range_pct = 1.0;
        config.payoff.num_points = 1;
        let report = validate_config(&config);
        assert!(report
            .errors
            .contains(&ValidationError::InvalidPriceRange(1.0)));
        assert!(report.errors.contains(&ValidationError::InvalidNumPoints(1)));
    }

    #[test]
    fn test_zoom_bounds() {
        let mut config = WorkbenchConfig::default();
        config.display.zoom = 4.5;
        assert!(validate_config(&config)
            .errors
            .contains(&ValidationError::InvalidZoom(4.5)));

        config.display.zoom = 1.3;
        let report = validate_config(&config);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.field == "display.zoom"));
    }

    #[test]
    fn test_storage_key_must_be_file_name() {
        let mut config = WorkbenchConfig::default();
        config.storage.storage_key = "../escape".to_string();
        assert!(!validate_config(&config).is_valid());
    }

    #[test]
    fn test_log_format() {
        let mut config = WorkbenchConfig::default();
        config.logging.format = "xml".to_string();
        assert_eq!(
            validate_config(&config).errors,
            vec![ValidationError::InvalidLogFormat("xml".to_string())]
        );
    }
}
