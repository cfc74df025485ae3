//! Command handlers wired to the backend, the comparison file and the
//! text renderers

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cli::{ChartArg, Commands, CompareAction, TabArg, ViewArgs};
use common::{ComparisonEntry, CustomLegRequest};
use config::{
    AlignmentMode, ChartStyle, DedupMode, DisplayConfig, DisplayTab, LoggingConfig, WorkbenchConfig,
};
use options_client::{sample, HttpOptionsClient, OptionsApi};
use payoff_view::render::{
    chain_table, comparison_table, legs_table, payoff_panel, risk_panel, strategy_summary,
};
use payoff_view::{merge, Alignment, ChartKind, RiskAnalysis, ViewSelection, ViewTab, ZoomLevel};
use strategy::{
    BuiltStrategy, ChainView, ComparisonStore, DedupPolicy, FileComparisonStore, Notification,
    NotificationLevel, Notifier, PayoffWindow, StrategyBuilder, TracingNotifier,
};
use tracing::info;

/// Prints notifications to stderr, keeping stdout for command output
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let tag = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{}] {}: {}", tag, notification.title, notification.description);
    }
}

/// JSON log output means a machine is reading; notifications then go into
/// the log stream instead of stderr text
fn notifications_to_log(logging: &LoggingConfig) -> bool {
    logging.format.eq_ignore_ascii_case("json")
}

pub struct Workbench {
    api: Arc<dyn OptionsApi>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn ComparisonStore>,
    window: PayoffWindow,
    alignment: Alignment,
    display: DisplayConfig,
}

impl Workbench {
    pub fn new(
        api: Arc<dyn OptionsApi>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn ComparisonStore>,
    ) -> Self {
        Self {
            api,
            notifier,
            store,
            window: PayoffWindow::default(),
            alignment: Alignment::default(),
            display: DisplayConfig::default(),
        }
    }

    /// Wire the HTTP client (or the built-in sample data when `offline`)
    /// and the on-disk comparison list from `config`
    pub fn from_config(config: &WorkbenchConfig, offline: bool) -> Result<Self> {
        let api: Arc<dyn OptionsApi> = if offline {
            info!("Using built-in sample data");
            Arc::new(sample::demo_api())
        } else {
            let timeout = config.api.timeout_seconds.map(Duration::from_secs);
            let client = HttpOptionsClient::with_timeout(&config.api.base_url, timeout)
                .context("Failed to create backend client")?;
            info!(base_url = client.base_url(), "Using pricing backend");
            Arc::new(client)
        };

        let policy = match config.comparison.dedup {
            DedupMode::Identity => DedupPolicy::Identity,
            DedupMode::Exact => DedupPolicy::Exact,
        };
        let store = FileComparisonStore::open(config.storage.comparison_path(), policy);

        let notifier: Arc<dyn Notifier> = if notifications_to_log(&config.logging) {
            Arc::new(TracingNotifier)
        } else {
            Arc::new(ConsoleNotifier)
        };

        let mut workbench = Self::new(api, notifier, Arc::new(store));
        workbench.window = PayoffWindow::new(config.payoff.price_range_pct, config.payoff.num_points);
        workbench.alignment = match config.payoff.alignment {
            AlignmentMode::Index => Alignment::Index,
            AlignmentMode::Price => Alignment::Price,
        };
        workbench.display = config.display.clone();
        Ok(workbench)
    }

    /// Execute one command and return what it prints
    pub async fn run(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Assets => self.assets().await,
            Commands::Definitions => self.definitions().await,
            Commands::Chain {
                asset,
                expiry,
                greeks,
            } => self.chain(&asset, expiry.as_deref(), greeks).await,
            Commands::Build {
                asset,
                strategy,
                quantity,
                compare,
                overlay,
                view,
            } => {
                self.build(asset.as_deref(), strategy.as_deref(), quantity, compare, overlay, &view)
                    .await
            }
            Commands::Custom {
                asset,
                legs,
                compare,
                view,
            } => self.custom(&asset, &legs, compare, &view).await,
            Commands::Compare { action } => self.compare(action),
            Commands::Init { .. } | Commands::Validate => {
                anyhow::bail!("configuration commands are handled before the workbench starts")
            }
        }
    }

    async fn assets(&self) -> Result<String> {
        let assets = self.api.list_assets().await?;
        if assets.is_empty() {
            return Ok("No assets with listed options".to_string());
        }
        Ok(assets.join("\n"))
    }

    async fn definitions(&self) -> Result<String> {
        let definitions = self.api.get_strategy_definitions().await?;
        let lines: Vec<String> = definitions
            .iter()
            .map(|d| format!("{:<24} {:<9} {}", d.name, d.bias.to_string(), d.description))
            .collect();
        Ok(lines.join("\n"))
    }

    async fn chain(&self, asset: &str, expiry: Option<&str>, greeks: bool) -> Result<String> {
        let view = ChainView::new(self.api.clone(), self.notifier.clone());
        view.select_asset(asset).await?;
        let chain = view
            .chain()
            .with_context(|| format!("No option chain loaded for {}", asset))?;
        Ok(chain_table(&chain, expiry, greeks))
    }

    fn builder(&self) -> StrategyBuilder {
        StrategyBuilder::new(self.api.clone(), self.notifier.clone()).with_window(self.window)
    }

    async fn build(
        &self,
        asset: Option<&str>,
        definition: Option<&str>,
        quantity: f64,
        compare: bool,
        overlay: bool,
        view: &ViewArgs,
    ) -> Result<String> {
        let builder = self.builder();
        builder.check_quantity(quantity)?;
        builder.load_catalog().await?;
        if let Some(asset) = asset {
            builder.select_asset(asset);
        }
        if let Some(definition) = definition {
            builder.select_definition(definition);
        }
        builder.set_quantity(quantity);

        let built = builder.build_selected().await?;
        if compare {
            builder.add_current_to_comparison(self.store.as_ref())?;
        }
        let overlaid = if overlay { self.store.entries() } else { Vec::new() };
        Ok(self.report(&built, &overlaid, view))
    }

    async fn custom(
        &self,
        asset: &str,
        legs: &[String],
        compare: bool,
        view: &ViewArgs,
    ) -> Result<String> {
        let requests = legs
            .iter()
            .map(|leg| CustomLegRequest::parse(leg))
            .collect::<common::Result<Vec<_>>>()?;

        let builder = self.builder();
        let built = builder.build_custom(asset, &requests).await?;
        if compare {
            builder.add_current_to_comparison(self.store.as_ref())?;
        }
        Ok(self.report(&built, &[], view))
    }

    fn compare(&self, action: CompareAction) -> Result<String> {
        match action {
            CompareAction::List => Ok(comparison_table(&self.store.entries())),
            CompareAction::Remove { index } => {
                let removed = index
                    .checked_sub(1)
                    .and_then(|i| self.store.remove(i))
                    .with_context(|| format!("No saved strategy at position {}", index))?;
                Ok(format!(
                    "Removed {} ({} saved)",
                    removed.label(),
                    self.store.len()
                ))
            }
            CompareAction::Clear => {
                let count = self.store.len();
                self.store.clear();
                Ok(format!("Cleared {} saved strategies", count))
            }
            CompareAction::Show { view } => {
                let entries = self.store.entries();
                if entries.is_empty() {
                    return Ok(comparison_table(&entries));
                }
                let merged = merge(None, &entries, self.alignment);
                Ok(format!(
                    "{}\n\n{}",
                    comparison_table(&entries),
                    payoff_panel(&merged, &self.selection(&view))
                ))
            }
        }
    }

    fn report(&self, built: &BuiltStrategy, overlaid: &[ComparisonEntry], view: &ViewArgs) -> String {
        let merged = merge(Some((&built.strategy, &built.payoff)), overlaid, self.alignment);
        let analysis = RiskAnalysis::analyze(&built.strategy, &built.payoff);
        [
            strategy_summary(&built.strategy, Some(&built.payoff)),
            legs_table(&built.strategy),
            risk_panel(&analysis),
            payoff_panel(&merged, &self.selection(view)),
        ]
        .join("\n\n")
    }

    /// Display defaults from the config with per-command flags on top
    fn selection(&self, args: &ViewArgs) -> ViewSelection {
        let chart = match (args.chart, self.display.chart) {
            (Some(ChartArg::Area), _) | (None, ChartStyle::Area) => ChartKind::Area,
            (Some(ChartArg::Line), _) | (None, ChartStyle::Line) => ChartKind::Line,
            (Some(ChartArg::Bar), _) | (None, ChartStyle::Bar) => ChartKind::Bar,
        };
        let tab = match (args.tab, self.display.tab) {
            (Some(TabArg::Graph), _) | (None, DisplayTab::Graph) => ViewTab::Graph,
            (Some(TabArg::Table), _) | (None, DisplayTab::Table) => ViewTab::Table,
        };
        ViewSelection {
            chart,
            tab,
            zoom: ZoomLevel::new(args.zoom.unwrap_or(self.display.zoom)),
            width: self.display.chart_width,
            height: self.display.chart_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use options_client::{ApiError, Endpoint};
    use strategy::{InMemoryComparisonStore, RecordingNotifier};

    struct Fixture {
        workbench: Workbench,
        store: Arc<InMemoryComparisonStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture(api: options_client::MockOptionsApi) -> Fixture {
        let store = Arc::new(InMemoryComparisonStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let workbench = Workbench::new(Arc::new(api), notifier.clone(), store.clone());
        Fixture {
            workbench,
            store,
            notifier,
        }
    }

    fn build(asset: &str, strategy: &str, compare: bool, overlay: bool) -> Commands {
        Commands::Build {
            asset: Some(asset.to_string()),
            strategy: Some(strategy.to_string()),
            quantity: 1.0,
            compare,
            overlay,
            view: ViewArgs::default(),
        }
    }

    #[tokio::test]
    async fn test_assets_and_definitions() {
        let f = fixture(sample::demo_api());
        let assets = f.workbench.run(Commands::Assets).await.unwrap();
        assert_eq!(assets, "BTC\nETH");

        let definitions = f.workbench.run(Commands::Definitions).await.unwrap();
        assert!(definitions.lines().next().unwrap().starts_with("Iron Condor"));
        assert!(definitions.contains("NEUTRAL"));
    }

    #[tokio::test]
    async fn test_build_renders_every_panel() {
        let f = fixture(sample::demo_api());
        let out = f
            .workbench
            .run(build("BTC", "Iron Condor", false, false))
            .await
            .unwrap();

        assert!(out.contains("Iron Condor"));
        assert!(out.contains("Payoff (1.0x zoom)"));
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn test_build_with_compare_saves_once() {
        let f = fixture(sample::demo_api());
        f.workbench
            .run(build("BTC", "Long Call", true, false))
            .await
            .unwrap();
        f.workbench
            .run(build("BTC", "Long Call", true, false))
            .await
            .unwrap();

        assert_eq!(f.store.len(), 1);
        let last = f.notifier.last().unwrap();
        assert_eq!(last.title, "Already added");
    }

    #[tokio::test]
    async fn test_compare_list_remove_clear() {
        let f = fixture(sample::demo_api());
        f.workbench
            .run(build("BTC", "Long Call", true, false))
            .await
            .unwrap();
        f.workbench
            .run(build("BTC", "Long Put", true, false))
            .await
            .unwrap();

        let list = f
            .workbench
            .run(Commands::Compare { action: CompareAction::List })
            .await
            .unwrap();
        assert!(list.contains("Long Call") && list.contains("Long Put"));

        let removed = f
            .workbench
            .run(Commands::Compare { action: CompareAction::Remove { index: 1 } })
            .await
            .unwrap();
        assert_eq!(removed, "Removed Long Call (1 saved)");

        assert!(f
            .workbench
            .run(Commands::Compare { action: CompareAction::Remove { index: 0 } })
            .await
            .is_err());

        let cleared = f
            .workbench
            .run(Commands::Compare { action: CompareAction::Clear })
            .await
            .unwrap();
        assert_eq!(cleared, "Cleared 1 saved strategies");
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn test_compare_show_empty() {
        let f = fixture(sample::demo_api());
        let out = f
            .workbench
            .run(Commands::Compare {
                action: CompareAction::Show { view: ViewArgs::default() },
            })
            .await
            .unwrap();
        assert!(out.starts_with("No strategies to compare"));
    }

    #[tokio::test]
    async fn test_zero_quantity_never_calls_backend() {
        let api = Arc::new(sample::demo_api());
        let store = Arc::new(InMemoryComparisonStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let workbench = Workbench::new(api.clone(), notifier.clone(), store);

        let result = workbench
            .run(Commands::Build {
                asset: Some("BTC".to_string()),
                strategy: Some("Iron Condor".to_string()),
                quantity: 0.0,
                compare: false,
                overlay: false,
                view: ViewArgs::default(),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(api.call_count(), 0);
        assert_eq!(
            notifier.last().unwrap().description,
            "Quantity must be greater than 0"
        );
    }

    #[tokio::test]
    async fn test_chain_command() {
        let f = fixture(sample::demo_api());
        let out = f
            .workbench
            .run(Commands::Chain {
                asset: "ETH".to_string(),
                expiry: None,
                greeks: true,
            })
            .await
            .unwrap();
        assert!(out.starts_with("ETH options @ $3,100.00"));
        assert!(out.contains("Delta"));
    }

    #[tokio::test]
    async fn test_custom_rejects_bad_leg() {
        let f = fixture(sample::demo_api());
        let result = f
            .workbench
            .run(Commands::Custom {
                asset: "BTC".to_string(),
                legs: vec!["BTC-261030-54000-C".to_string()],
                compare: false,
                view: ViewArgs::default(),
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces() {
        let f = fixture(sample::demo_api().with_failure(Endpoint::ListAssets, ApiError::status_only(503)));
        assert!(f.workbench.run(Commands::Assets).await.is_err());
        assert!(f
            .workbench
            .run(build("BTC", "Long Call", false, false))
            .await
            .is_err());
        assert_eq!(
            f.notifier.last().unwrap().description,
            "Failed to fetch assets or strategy definitions"
        );
    }

    #[test]
    fn test_view_flags_override_config() {
        let f = fixture(sample::demo_api());
        let selection = f.workbench.selection(&ViewArgs {
            chart: Some(ChartArg::Bar),
            tab: None,
            zoom: Some(2.2),
        });
        assert_eq!(selection.chart, ChartKind::Bar);
        assert_eq!(selection.tab, ViewTab::Graph);
        assert_eq!(selection.zoom.value(), 2.0);
    }

    #[test]
    fn test_json_logging_routes_notifications_to_log() {
        let mut logging = LoggingConfig::default();
        assert!(!notifications_to_log(&logging));
        logging.format = "JSON".to_string();
        assert!(notifications_to_log(&logging));
    }

    #[test]
    fn test_from_config_offline() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WorkbenchConfig::default();
        config.storage.directory = Some(dir.path().to_path_buf());
        config.payoff.alignment = AlignmentMode::Index;

        let workbench = Workbench::from_config(&config, true).unwrap();
        assert_eq!(workbench.alignment, Alignment::Index);
        assert!(workbench.store.is_empty());
    }
}
