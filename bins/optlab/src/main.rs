//! optlab - options strategy workbench
//!
//! Entry point: parses the command line, loads `optlab.yaml` (or the
//! defaults), sets up logging and dispatches to the workbench.

mod workbench;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{
    generate_default_config, load_config, load_or_default, save_config, validate_config,
    ValidationReport, WorkbenchConfig,
};
use observability::{init_logging, LogFormat};
use std::path::Path;
use tracing::{debug, error, info, warn};
use workbench::Workbench;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let loaded = load_or_default(&cli.config);
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let format = cli
        .log_format
        .map(|f| f.as_str().to_string())
        .unwrap_or(logging.format);
    init_logging(
        "optlab",
        LogFormat::parse(&format).unwrap_or_default(),
        &logging.level,
    )?;
    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output)
        }
        Commands::Validate => {
            info!("Executing 'validate' command");
            validate_command(&cli.config)
        }
        command => {
            let mut config = loaded?;
            config.logging.format = format;
            if let Some(url) = cli.api_url {
                debug!(%url, "Backend URL overridden from the command line");
                config.api.base_url = url;
            }
            check_config(&config)?;

            let workbench = Workbench::from_config(&config, cli.offline)?;
            let output = workbench.run(command).await?;
            println!("{}", output);
            Ok(())
        }
    }
}

/// Refuse to talk to the backend with an invalid configuration
fn check_config(config: &WorkbenchConfig) -> Result<()> {
    let report = validate_config(config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message);
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Invalid configuration; run 'optlab validate' for details");
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
    }
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);
    print_report(&report);
    if !report.is_valid() {
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Backend: {}", config.api.base_url);
    match config.api.timeout_seconds {
        Some(secs) => println!("Timeout: {}s", secs),
        None => println!("Timeout: none"),
    }
    println!("Comparison file: {}", config.storage.comparison_path().display());
    println!(
        "Payoff window: +/-{:.0}% over {} points",
        config.payoff.price_range_pct * 100.0,
        config.payoff.num_points
    );

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - Backend URL ({})", config.api.base_url);
    println!("  - Comparison storage (key '{}')", config.storage.storage_key);
    println!("  - Payoff window and chart defaults");
    println!();
    println!("Next steps:");
    println!("  1. Point api.base_url at your pricing backend");
    println!(
        "  2. Run 'optlab validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'optlab build --config {:?}' to construct a strategy",
        output_path
    );

    Ok(())
}
