//! Option chain selection

use std::sync::Arc;

use common::OptionChain;
use options_client::OptionsApi;
use parking_lot::RwLock;

use crate::error::StrategyResult;
use crate::generation::RequestGenerations;
use crate::notify::{Notification, Notifier};

const CHAIN_REQUEST: &str = "chain";

/// What happened to a finished chain request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainUpdate {
    Applied,
    /// A newer selection was made while this one was in flight
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ChainState {
    asset: Option<String>,
    chain: Option<OptionChain>,
}

/// Selected asset and its chain
///
/// Responses that arrive after a newer selection are dropped, so the shown
/// chain always belongs to the last asset picked.
pub struct ChainView {
    api: Arc<dyn OptionsApi>,
    notifier: Arc<dyn Notifier>,
    generations: RequestGenerations,
    state: RwLock<ChainState>,
}

impl ChainView {
    pub fn new(api: Arc<dyn OptionsApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            generations: RequestGenerations::new(),
            state: RwLock::new(ChainState::default()),
        }
    }

    pub fn selected_asset(&self) -> Option<String> {
        self.state.read().asset.clone()
    }

    pub fn chain(&self) -> Option<OptionChain> {
        self.state.read().chain.clone()
    }

    /// Select `asset` and fetch its chain
    ///
    /// A failure leaves the previous chain in place.
    pub async fn select_asset(&self, asset: &str) -> StrategyResult<ChainUpdate> {
        let ticket = self.generations.issue(CHAIN_REQUEST);
        self.state.write().asset = Some(asset.to_string());

        let result = self.api.get_option_chain(asset).await;

        if !self.generations.is_current(&ticket) {
            tracing::debug!(asset, generation = ticket.value(), "Discarding superseded chain response");
            return Ok(ChainUpdate::Discarded);
        }

        match result {
            Ok(chain) => {
                tracing::info!(
                    asset,
                    expiries = chain.expiries.len(),
                    contracts = chain.contract_count(),
                    "Option chain loaded"
                );
                self.state.write().chain = Some(chain);
                self.notifier.notify(Notification::info(
                    "Option chain loaded",
                    format!("Option chain for {} loaded successfully", asset),
                ));
                Ok(ChainUpdate::Applied)
            }
            Err(e) => {
                tracing::error!(asset, error = %e, "Option chain fetch failed");
                self.notifier
                    .notify(Notification::error("Failed to fetch option chain"));
                Err(e.into())
            }
        }
    }
}
