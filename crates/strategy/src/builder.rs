//! Strategy Builder - catalog loading and the construct-then-payoff flow

use std::sync::Arc;

use common::{ComparisonEntry, CustomLegRequest, Strategy, StrategyDefinition, StrategyPayoff};
use options_client::{ApiError, OptionsApi};
use parking_lot::RwLock;

use crate::comparison::{AddOutcome, ComparisonStore};
use crate::error::{StrategyError, StrategyResult};
use crate::notify::{Notification, Notifier};

/// Price window requested from the payoff endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffWindow {
    /// Half-width as a fraction of the underlying price
    pub range_pct: f64,
    pub num_points: u32,
}

impl PayoffWindow {
    pub fn new(range_pct: f64, num_points: u32) -> Self {
        Self {
            range_pct,
            num_points,
        }
    }

    /// `(price_min, price_max)` around `price`
    pub fn bounds(&self, price: f64) -> (f64, f64) {
        (price * (1.0 - self.range_pct), price * (1.0 + self.range_pct))
    }
}

impl Default for PayoffWindow {
    fn default() -> Self {
        Self::new(0.15, 100)
    }
}

/// A constructed strategy together with its payoff
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStrategy {
    pub strategy: Strategy,
    pub payoff: StrategyPayoff,
}

impl From<BuiltStrategy> for ComparisonEntry {
    fn from(built: BuiltStrategy) -> Self {
        ComparisonEntry::new(built.strategy, built.payoff)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuilderState {
    pub assets: Vec<String>,
    pub definitions: Vec<StrategyDefinition>,
    pub selected_asset: Option<String>,
    pub selected_definition: Option<String>,
    pub quantity: f64,
    /// Last successfully built pair; never half-updated
    pub current: Option<BuiltStrategy>,
    pub is_loading: bool,
}

impl Default for BuilderState {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            definitions: Vec::new(),
            selected_asset: None,
            selected_definition: None,
            quantity: 1.0,
            current: None,
            is_loading: false,
        }
    }
}

/// Strategy Builder - drives construction against the backend
pub struct StrategyBuilder {
    api: Arc<dyn OptionsApi>,
    notifier: Arc<dyn Notifier>,
    window: PayoffWindow,
    state: RwLock<BuilderState>,
}

enum Construction<'a> {
    Template {
        definition_name: &'a str,
        quantity: f64,
    },
    Custom {
        legs: &'a [CustomLegRequest],
    },
}

impl StrategyBuilder {
    pub fn new(api: Arc<dyn OptionsApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            window: PayoffWindow::default(),
            state: RwLock::new(BuilderState::default()),
        }
    }

    pub fn with_window(mut self, window: PayoffWindow) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> PayoffWindow {
        self.window
    }

    /// Snapshot of the builder state
    pub fn state(&self) -> BuilderState {
        self.state.read().clone()
    }

    pub fn current(&self) -> Option<BuiltStrategy> {
        self.state.read().current.clone()
    }

    pub fn select_asset(&self, asset: impl Into<String>) {
        self.state.write().selected_asset = Some(asset.into());
    }

    pub fn select_definition(&self, definition_name: impl Into<String>) {
        self.state.write().selected_definition = Some(definition_name.into());
    }

    pub fn set_quantity(&self, quantity: f64) {
        self.state.write().quantity = quantity;
    }

    /// Fetch assets and definitions concurrently, preselecting the first of
    /// each
    ///
    /// On failure the state is left untouched.
    pub async fn load_catalog(&self) -> StrategyResult<()> {
        let fetched = tokio::try_join!(self.api.list_assets(), self.api.get_strategy_definitions());

        let (assets, definitions) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "Catalog fetch failed");
                self.notifier
                    .notify(Notification::error("Failed to fetch assets or strategy definitions"));
                return Err(e.into());
            }
        };

        tracing::info!(
            assets = assets.len(),
            definitions = definitions.len(),
            "Strategy catalog loaded"
        );

        let mut state = self.state.write();
        state.selected_asset = state
            .selected_asset
            .take()
            .or_else(|| assets.first().cloned());
        state.selected_definition = state
            .selected_definition
            .take()
            .or_else(|| definitions.first().map(|d| d.name.clone()));
        state.assets = assets;
        state.definitions = definitions;
        Ok(())
    }

    /// Construct `definition_name` on `asset` and fetch its payoff
    ///
    /// Flow:
    /// 1. Validate inputs locally
    /// 2. Construct the strategy
    /// 3. Request the payoff over the window around the construction price
    /// 4. Replace the current pair and notify
    pub async fn build_strategy(
        &self,
        definition_name: &str,
        asset: &str,
        quantity: f64,
    ) -> StrategyResult<BuiltStrategy> {
        if definition_name.trim().is_empty() || asset.trim().is_empty() {
            return Err(self.reject("Please select both an asset and a strategy"));
        }
        self.check_quantity(quantity)?;

        tracing::info!(definition = definition_name, asset, quantity, "Constructing strategy");
        self.run(
            asset,
            Construction::Template {
                definition_name,
                quantity,
            },
        )
        .await
    }

    /// Build with the selected asset, definition and quantity
    pub async fn build_selected(&self) -> StrategyResult<BuiltStrategy> {
        let (definition, asset, quantity) = {
            let state = self.state.read();
            (
                state.selected_definition.clone().unwrap_or_default(),
                state.selected_asset.clone().unwrap_or_default(),
                state.quantity,
            )
        };
        self.build_strategy(&definition, &asset, quantity).await
    }

    /// Construct a strategy from explicit legs and fetch its payoff
    pub async fn build_custom(
        &self,
        asset: &str,
        legs: &[CustomLegRequest],
    ) -> StrategyResult<BuiltStrategy> {
        if asset.trim().is_empty() {
            return Err(self.reject("Please select an asset"));
        }
        if legs.is_empty() {
            return Err(self.reject("Please select at least one option"));
        }
        if let Some(leg) = legs
            .iter()
            .find(|leg| leg.quantity <= 0.0 || !leg.quantity.is_finite())
        {
            return Err(self.reject(format!(
                "Quantity for {} must be greater than 0",
                leg.option_symbol
            )));
        }

        tracing::info!(asset, legs = legs.len(), "Constructing custom strategy");
        self.run(asset, Construction::Custom { legs }).await
    }

    /// Reject a non-positive or non-finite base quantity before any request
    pub fn check_quantity(&self, quantity: f64) -> StrategyResult<()> {
        if quantity <= 0.0 || !quantity.is_finite() {
            return Err(self.reject("Quantity must be greater than 0"));
        }
        Ok(())
    }

    /// Save the current strategy to `store`
    pub fn add_current_to_comparison(&self, store: &dyn ComparisonStore) -> StrategyResult<AddOutcome> {
        let current = match self.current() {
            Some(current) => current,
            None => return Err(self.reject("Build a strategy before adding it to the comparison")),
        };

        let name = current.strategy.definition_name.clone();
        let outcome = store.add(current.into());
        match outcome {
            AddOutcome::Added(index) => {
                tracing::info!(strategy = %name, index, "Added to comparison");
                self.notifier.notify(Notification::success(format!(
                    "{} added to comparison ({} saved)",
                    name,
                    store.len()
                )));
            }
            AddOutcome::AlreadyPresent => {
                tracing::debug!(strategy = %name, "Already in comparison");
                self.notifier.notify(Notification::info(
                    "Already added",
                    format!("{} is already in the comparison", name),
                ));
            }
        }
        Ok(outcome)
    }

    async fn run(&self, asset: &str, construction: Construction<'_>) -> StrategyResult<BuiltStrategy> {
        self.state.write().is_loading = true;
        let result = self.construct_and_price(asset, construction).await;
        self.state.write().is_loading = false;

        match result {
            Ok(built) => {
                tracing::info!(
                    strategy = %built.strategy.definition_name,
                    legs = built.strategy.legs.len(),
                    points = built.payoff.payoff.len(),
                    "Strategy constructed"
                );
                self.state.write().current = Some(built.clone());
                self.notifier
                    .notify(Notification::success("Strategy constructed successfully"));
                Ok(built)
            }
            Err(e) => {
                tracing::error!(asset, error = %e, "Strategy construction failed");
                let description = match &e {
                    ApiError::Api { message, .. } if !message.is_empty() => message.clone(),
                    _ => "Failed to construct strategy".to_string(),
                };
                self.notifier.notify(Notification::error(description));
                Err(StrategyError::Api(e))
            }
        }
    }

    async fn construct_and_price(
        &self,
        asset: &str,
        construction: Construction<'_>,
    ) -> Result<BuiltStrategy, ApiError> {
        let strategy = match construction {
            Construction::Template {
                definition_name,
                quantity,
            } => {
                self.api
                    .construct_strategy(definition_name, asset, quantity)
                    .await?
            }
            Construction::Custom { legs } => self.api.construct_custom_strategy(asset, legs).await?,
        };

        let (price_min, price_max) = self.window.bounds(strategy.underlying_price_at_construction);
        let payoff = self
            .api
            .calculate_payoff(&strategy, price_min, price_max, self.window.num_points)
            .await?;

        Ok(BuiltStrategy { strategy, payoff })
    }

    fn reject(&self, message: impl Into<String>) -> StrategyError {
        let message = message.into();
        tracing::warn!(reason = %message, "Strategy request rejected");
        self.notifier.notify(Notification::error(message.clone()));
        StrategyError::Validation(message)
    }
}
