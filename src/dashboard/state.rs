use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::actions::{Action, ActionRequest, Outcome};
use crate::types::{ListingRow, ObjectId, SuiAddress};

/// Values typed into the dashboard forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub widget_to_list: String,
    pub price: String,
    pub item_to_purchase: String,
    pub amount_sent: String,
}

impl FormInputs {
    pub fn list_request(&self) -> ActionRequest {
        ActionRequest::List {
            widget: self.widget_to_list.clone(),
            price: self.price.clone(),
        }
    }

    pub fn purchase_request(&self) -> ActionRequest {
        ActionRequest::Purchase {
            item: self.item_to_purchase.clone(),
            amount: self.amount_sent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

/// What applying an outcome asks the view to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Toast(String),
    Alert(String),
}

/// Everything the dashboard renders. Lives only as long as the process.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub account: Option<SuiAddress>,
    pub owned_widgets: Vec<ObjectId>,
    pub listings: Vec<ListingRow>,
    pub form: FormInputs,
    pub toasts: Vec<Toast>,
    alerts: VecDeque<String>,
    in_flight: usize,
    toast_ttl: Duration,
}

impl DashboardState {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            account: None,
            owned_widgets: Vec::new(),
            listings: Vec::new(),
            form: FormInputs::default(),
            toasts: Vec::new(),
            alerts: VecDeque::new(),
            in_flight: 0,
            toast_ttl,
        }
    }

    /// Record that an action task was started.
    pub fn started(&mut self) {
        self.in_flight += 1;
    }

    /// Number of actions still waiting on the chain or wallet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn set_account(&mut self, account: Option<SuiAddress>) {
        self.account = account;
    }

    /// Fold a finished action into state.
    ///
    /// Only successful queries replace displayed lists; a failure leaves them
    /// as they were and queues exactly one alert.
    pub fn apply(&mut self, outcome: Outcome) -> Notice {
        self.in_flight = self.in_flight.saturating_sub(1);
        let action = match outcome {
            Outcome::Submitted { action, .. } => action,
            Outcome::OwnedWidgets(widgets) => {
                self.owned_widgets = widgets;
                Action::RefreshWidgets
            }
            Outcome::Listings(listings) => {
                self.listings = listings;
                Action::RefreshListings
            }
            Outcome::Failed { action, .. } => {
                let message = action.failure_message().to_string();
                self.raise_alert(message.clone());
                return Notice::Alert(message);
            }
        };

        let message = action.success_message().to_string();
        self.push_toast(message.clone(), Instant::now());
        Notice::Toast(message)
    }

    pub fn raise_alert(&mut self, message: impl Into<String>) {
        self.alerts.push_back(message.into());
    }

    /// Alert currently blocking the screen.
    pub fn alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn pending_alerts(&self) -> usize {
        self.alerts.len()
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub fn push_toast(&mut self, message: String, now: Instant) {
        self.toasts.push(Toast {
            message,
            expires_at: now + self.toast_ttl,
        });
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{ExecutionResult, ExecutionStatus, TransactionEffects};

    fn state() -> DashboardState {
        DashboardState::new(Duration::from_millis(3000))
    }

    fn row(id: &str) -> ListingRow {
        ListingRow {
            listing_id: ObjectId::from(id),
            ask_price: "1".to_string(),
            owner: "0xO".to_string(),
            widget: "0xW".to_string(),
        }
    }

    #[test]
    fn test_failure_keeps_lists_and_alerts_once() {
        let mut state = state();
        state.apply(Outcome::Listings(vec![row("0xL1")]));
        state.apply(Outcome::OwnedWidgets(vec![ObjectId::from("0xW1")]));
        let toasts_before = state.toasts.len();

        let notice = state.apply(Outcome::Failed {
            action: Action::Purchase,
            error: "User rejected the request".to_string(),
        });

        assert_eq!(
            notice,
            Notice::Alert("Failed to purchase listing".to_string())
        );
        assert_eq!(state.listings, vec![row("0xL1")]);
        assert_eq!(state.owned_widgets, vec![ObjectId::from("0xW1")]);
        assert_eq!(state.pending_alerts(), 1);
        assert_eq!(state.alert(), Some("Failed to purchase listing"));
        assert_eq!(state.toasts.len(), toasts_before);
    }

    #[test]
    fn test_submitted_toasts_without_touching_lists() {
        let mut state = state();
        state.apply(Outcome::Listings(vec![row("0xL1")]));

        let notice = state.apply(Outcome::Submitted {
            action: Action::List,
            result: ExecutionResult {
                digest: "D".to_string(),
                effects: TransactionEffects {
                    status: ExecutionStatus::success(),
                    created: vec![],
                },
            },
        });

        assert_eq!(notice, Notice::Toast("Listing created!".to_string()));
        assert_eq!(state.listings, vec![row("0xL1")]);
        assert!(state.alert().is_none());
    }

    #[test]
    fn test_alerts_queue_and_dismiss() {
        let mut state = state();
        state.raise_alert("first");
        state.raise_alert("second");

        assert_eq!(state.alert(), Some("first"));
        state.dismiss_alert();
        assert_eq!(state.alert(), Some("second"));
        state.dismiss_alert();
        assert!(state.alert().is_none());
    }

    #[test]
    fn test_toasts_expire() {
        let mut state = state();
        let now = Instant::now();
        state.push_toast("hello".to_string(), now);

        state.expire_toasts(now + Duration::from_millis(2999));
        assert_eq!(state.toasts.len(), 1);
        state.expire_toasts(now + Duration::from_millis(3000));
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn test_in_flight_tracking() {
        let mut state = state();
        state.started();
        state.started();
        assert_eq!(state.in_flight(), 2);
        state.apply(Outcome::Listings(vec![]));
        assert_eq!(state.in_flight(), 1);
    }

    #[test]
    fn test_form_requests() {
        let mut state = state();
        state.form.widget_to_list = "0xW".to_string();
        state.form.price = "10".to_string();
        state.form.item_to_purchase = "0xL".to_string();
        state.form.amount_sent = "10".to_string();

        assert_eq!(
            state.form.list_request(),
            ActionRequest::List {
                widget: "0xW".to_string(),
                price: "10".to_string()
            }
        );
        assert_eq!(
            state.form.purchase_request(),
            ActionRequest::Purchase {
                item: "0xL".to_string(),
                amount: "10".to_string()
            }
        );
    }
}
