//! Two-stage session: ID entry, then the marketplace dashboard.

pub mod actions;
pub mod gate;
pub mod state;

pub use actions::{Action, ActionRequest, MarketActions, Outcome};
pub use gate::{IdEntry, GATE_ALERT};
pub use state::{DashboardState, FormInputs, Notice, Toast};

use std::time::Duration;

use crate::types::MarketplaceRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    IdEntry(IdEntry),
    Dashboard(MarketplaceRef),
}

/// Top-level view state.
#[derive(Debug, Clone)]
pub struct App {
    pub screen: Screen,
    pub state: DashboardState,
}

impl App {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            screen: Screen::IdEntry(IdEntry::default()),
            state: DashboardState::new(toast_ttl),
        }
    }

    /// Skip the gate when the marketplace is already known.
    pub fn unlocked(market: MarketplaceRef, toast_ttl: Duration) -> Self {
        Self {
            screen: Screen::Dashboard(market),
            state: DashboardState::new(toast_ttl),
        }
    }

    /// Try to leave the ID-entry screen. Returns the marketplace on success;
    /// otherwise raises the gate alert and stays put.
    pub fn submit_ids(&mut self) -> Option<MarketplaceRef> {
        let Screen::IdEntry(entry) = &self.screen else {
            return None;
        };
        match entry.submit() {
            Some(market) => {
                self.screen = Screen::Dashboard(market.clone());
                Some(market)
            }
            None => {
                self.state.raise_alert(GATE_ALERT);
                None
            }
        }
    }

    pub fn marketplace(&self) -> Option<&MarketplaceRef> {
        match &self.screen {
            Screen::Dashboard(market) => Some(market),
            Screen::IdEntry(_) => None,
        }
    }
}
