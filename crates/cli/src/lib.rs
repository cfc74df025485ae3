use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "optlab")]
#[command(about = "optlab - options strategy workbench for a pricing backend")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Path to the configuration file (defaults apply when it is absent)
    #[arg(short, long, global = true, default_value = "optlab.yaml")]
    pub config: PathBuf,

    /// Override the backend base URL
    #[arg(long, global = true, env = "OPTLAB_API_URL")]
    pub api_url: Option<String>,

    /// Override the log output format
    #[arg(long, global = true, value_enum, env = "OPTLAB_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    /// Use built-in sample data instead of the backend
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List assets with option chains
    Assets,

    /// List strategy templates with their bias and description
    Definitions,

    /// Show the option chain for an asset
    Chain {
        /// Underlying asset (e.g. BTC)
        asset: String,

        /// Expiry key to display (defaults to the earliest)
        #[arg(short, long)]
        expiry: Option<String>,

        /// Show Greeks instead of prices
        #[arg(long)]
        greeks: bool,
    },

    /// Construct a strategy from a template and show its payoff
    Build {
        /// Underlying asset (defaults to the first listed)
        #[arg(short, long)]
        asset: Option<String>,

        /// Strategy template name (defaults to the first listed)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Base quantity
        #[arg(short, long, default_value_t = 1.0)]
        quantity: f64,

        /// Add the built strategy to the comparison list
        #[arg(long)]
        compare: bool,

        /// Overlay saved comparison strategies on the payoff view
        #[arg(long)]
        overlay: bool,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Construct a strategy from explicit legs
    Custom {
        /// Underlying asset
        #[arg(short, long)]
        asset: String,

        /// Leg as SYMBOL:SIDE[:QTY], repeatable
        #[arg(short, long = "leg", required = true)]
        legs: Vec<String>,

        /// Add the built strategy to the comparison list
        #[arg(long)]
        compare: bool,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Manage the saved comparison list
    Compare {
        #[command(subcommand)]
        action: CompareAction,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "optlab.yaml")]
        output: PathBuf,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Subcommand, Debug)]
pub enum CompareAction {
    /// Summarize saved strategies
    List,

    /// Remove a saved strategy by its position (1-based, as listed)
    Remove {
        index: usize,
    },

    /// Remove every saved strategy
    Clear,

    /// Plot or tabulate all saved payoffs together
    Show {
        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Payoff view overrides shared by the build and compare commands
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Chart style
    #[arg(long, value_enum)]
    pub chart: Option<ChartArg>,

    /// Show the graph or the data table
    #[arg(long, value_enum)]
    pub tab: Option<TabArg>,

    /// Zoom factor between 1.0 and 4.0
    #[arg(long)]
    pub zoom: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartArg {
    Area,
    Line,
    Bar,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabArg {
    Graph,
    Table,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
