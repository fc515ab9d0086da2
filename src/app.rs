// ============================================================================
// Structure : App
// ============================================================================
// Central application state. The UI reads from App, every mutation goes
// through its methods, the worker thread reports back through outcome enums
// applied here.
// ============================================================================

use anyhow::{bail, Result};
use chrono::Local;

use crate::api::SellOrder;
use crate::models::{format_fixed2, AllocationSeries, AssetType, Holding};

/// Screens of the application. One active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Holdings table + allocation chart.
    Dashboard,

    /// Sell dialog drawn over the dashboard.
    SellDialog,
}

/// Visual tone of the sell dialog's status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Success,
    Warning,
    Danger,
}

/// Lifecycle of the price lookup behind the sell dialog.
///
/// Fetching is entered synchronously when the dialog opens; exactly one of
/// the three terminal states is entered once the request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceStatus {
    Idle,
    Fetching,
    /// Settled with a usable price; carries the asset name for the message.
    Success(String),
    /// Settled without a usable price, manual entry required.
    NoPrice,
    /// Transport or parse failure, manual entry required.
    Failed,
}

impl PriceStatus {
    /// Message shown next to the price input.
    pub fn text(&self) -> String {
        match self {
            PriceStatus::Idle => String::new(),
            PriceStatus::Fetching => "Fetching current price...".to_string(),
            PriceStatus::Success(name) => format!("Current market price for {}", name),
            PriceStatus::NoPrice | PriceStatus::Failed => {
                "Could not fetch price. Please enter manually.".to_string()
            }
        }
    }

    /// Visual tone of the message. NoPrice and Failed share a text but stay
    /// visually distinct: a dead transport is a harder failure than a
    /// backend with no price source.
    pub fn tone(&self) -> Tone {
        match self {
            PriceStatus::Idle | PriceStatus::Fetching => Tone::Muted,
            PriceStatus::Success(_) => Tone::Success,
            PriceStatus::NoPrice => Tone::Warning,
            PriceStatus::Failed => Tone::Danger,
        }
    }
}

/// Settled result of one price lookup, reported by the worker.
#[derive(Debug, Clone)]
pub enum PriceOutcome {
    Price(f64),
    Unavailable,
    Failed,
}

/// Field focus inside the sell dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellField {
    Quantity,
    Price,
}

/// State of the sell dialog.
#[derive(Debug, Clone)]
pub struct SellDialog {
    /// Backend id of the asset being sold.
    pub asset_id: u64,

    /// Display name.
    pub asset_name: String,

    /// Symbol and category, the price lookup key.
    pub symbol: String,
    pub asset_type: AssetType,

    /// Upper bound for the quantity input.
    pub max_quantity: f64,

    /// Submission target, `<base>/assets/<id>/sell`.
    pub form_action: String,

    /// Quantity input buffer.
    pub quantity_input: String,

    /// Price input buffer.
    pub price_input: String,

    /// Read-only restriction on the price input. Imposed while the lookup is
    /// pending and kept when it succeeds; lifted when manual entry is needed.
    pub price_locked: bool,

    /// Price lookup state, drives the status line.
    pub status: PriceStatus,

    /// Currently focused input field.
    pub focus: SellField,
}

impl SellDialog {
    /// Max quantity as displayed, always two decimals.
    pub fn max_quantity_text(&self) -> String {
        format_fixed2(self.max_quantity)
    }
}

/// Central application state.
pub struct App {
    /// False once the user confirmed quitting.
    pub running: bool,

    /// Positions with a non-zero quantity.
    pub holdings: Vec<Holding>,

    /// Selected row in the holdings table.
    pub selected_index: usize,

    /// Active screen.
    pub current_screen: Screen,

    /// Two-step quit confirmation, first 'q' arms it.
    pub confirm_quit: bool,

    /// Sell dialog state, present while the dialog is (or was) open.
    pub sell_dialog: Option<SellDialog>,

    /// Transient message shown in the footer (sell feedback).
    pub status_message: Option<(String, Tone)>,

    /// Backend base URL, used to build form actions.
    pub api_base: String,
}

impl App {
    pub fn new(api_base: String) -> Self {
        Self {
            running: true,
            holdings: Vec::new(),
            selected_index: 0,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            sell_dialog: None,
            status_message: None,
            api_base,
        }
    }

    pub fn with_holdings(api_base: String, holdings: Vec<Holding>) -> Self {
        Self {
            holdings,
            ..Self::new(api_base)
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// First 'q' arms the confirmation, second one quits.
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.holdings.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn selected_holding(&self) -> Option<&Holding> {
        self.holdings.get(self.selected_index)
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_in_sell_dialog(&self) -> bool {
        self.current_screen == Screen::SellDialog
    }

    /// Allocation series for the chart, derived from current holdings.
    pub fn allocation(&self) -> AllocationSeries {
        AllocationSeries::from_holdings(&self.holdings)
    }

    /// Called on every loop iteration.
    pub fn tick(&mut self) {}

    // ========================================================================
    // Sell dialog
    // ========================================================================

    /// Opens the sell dialog for the selected holding.
    ///
    /// This is the entire synchronous phase: every field is populated, the
    /// price input is cleared and locked, the status line enters Fetching and
    /// the dialog becomes the active screen before any network activity is
    /// observable. The caller dispatches the price lookup afterwards.
    ///
    /// Returns the holding so the caller can build the fetch command.
    pub fn open_sell_dialog(&mut self) -> Option<Holding> {
        let holding = self.selected_holding()?.clone();

        self.sell_dialog = Some(SellDialog {
            asset_id: holding.id,
            asset_name: holding.name.clone(),
            symbol: holding.symbol.clone(),
            asset_type: holding.asset_type,
            max_quantity: holding.quantity,
            form_action: crate::api::sell_form_action(&self.api_base, holding.id),
            quantity_input: String::new(),
            price_input: String::new(),
            price_locked: true,
            status: PriceStatus::Fetching,
            focus: SellField::Quantity,
        });
        self.current_screen = Screen::SellDialog;
        self.status_message = None;

        Some(holding)
    }

    /// Applies a settled price lookup to the dialog.
    ///
    /// Applied unconditionally: reopening the dialog starts a new independent
    /// lookup and a late result from a previous one may still land here.
    /// Last write wins, accepted for a single-user client.
    pub fn apply_price_outcome(&mut self, asset_name: &str, outcome: PriceOutcome) {
        let Some(dialog) = self.sell_dialog.as_mut() else {
            return;
        };

        match outcome {
            PriceOutcome::Price(price) => {
                dialog.price_input = format_fixed2(price);
                dialog.status = PriceStatus::Success(asset_name.to_string());
            }
            PriceOutcome::Unavailable => {
                dialog.price_input.clear();
                dialog.price_locked = false;
                dialog.status = PriceStatus::NoPrice;
            }
            PriceOutcome::Failed => {
                dialog.price_input.clear();
                dialog.price_locked = false;
                dialog.status = PriceStatus::Failed;
            }
        }
    }

    pub fn close_sell_dialog(&mut self) {
        self.sell_dialog = None;
        self.current_screen = Screen::Dashboard;
    }

    /// Switches focus between the quantity and price inputs.
    pub fn toggle_sell_focus(&mut self) {
        if let Some(dialog) = self.sell_dialog.as_mut() {
            dialog.focus = match dialog.focus {
                SellField::Quantity => SellField::Price,
                SellField::Price => SellField::Quantity,
            };
        }
    }

    /// Appends a character to the focused input. Edits to a locked price
    /// input are ignored.
    pub fn sell_input_char(&mut self, c: char) {
        if let Some(dialog) = self.sell_dialog.as_mut() {
            match dialog.focus {
                SellField::Quantity => dialog.quantity_input.push(c),
                SellField::Price if !dialog.price_locked => dialog.price_input.push(c),
                SellField::Price => {}
            }
        }
    }

    /// Deletes the last character of the focused input.
    pub fn sell_input_backspace(&mut self) {
        if let Some(dialog) = self.sell_dialog.as_mut() {
            match dialog.focus {
                SellField::Quantity => {
                    dialog.quantity_input.pop();
                }
                SellField::Price if !dialog.price_locked => {
                    dialog.price_input.pop();
                }
                SellField::Price => {}
            }
        }
    }

    /// Validates the dialog inputs into a sell order.
    pub fn sell_order(&self) -> Result<SellOrder> {
        let Some(dialog) = self.sell_dialog.as_ref() else {
            bail!("No sell dialog open");
        };

        let quantity: f64 = dialog
            .quantity_input
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Quantity is not a number"))?;
        let unit_price: f64 = dialog
            .price_input
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Price is not a number"))?;

        if quantity <= 0.0 || unit_price <= 0.0 {
            bail!("Quantity and price must be greater than zero");
        }
        if quantity > dialog.max_quantity {
            bail!(
                "Cannot sell {} units. Only {} units available.",
                quantity,
                dialog.max_quantity
            );
        }

        Ok(SellOrder {
            quantity,
            unit_price,
            date: Local::now().date_naive(),
            note: format!("Sold {} units of {}", quantity, dialog.asset_name),
        })
    }

    /// Applies an accepted sell order to the local holdings.
    ///
    /// The backend is the source of truth; this mirrors its effect so the
    /// dashboard is correct without a full reload. Positions sold down to
    /// zero disappear from the table, like the backend's active filter.
    pub fn apply_sell(&mut self, asset_id: u64, quantity: f64) {
        if let Some(holding) = self.holdings.iter_mut().find(|h| h.id == asset_id) {
            holding.quantity = (holding.quantity - quantity).max(0.0);
        }
        self.holdings.retain(|h| h.quantity > 0.0);
        if self.selected_index >= self.holdings.len() && self.selected_index > 0 {
            self.selected_index = self.holdings.len() - 1;
        }
    }

    pub fn set_status_message(&mut self, message: String, tone: Tone) {
        self.status_message = Some((message, tone));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:5000";

    fn sample_app() -> App {
        App::with_holdings(
            BASE.to_string(),
            vec![
                Holding::new(17, "Gold", "XAU/USD", AssetType::Commodity, 5.0, 2000.0),
                Holding::new(23, "Apple Inc.", "AAPL", AssetType::Stock, 3.1, 250.0),
            ],
        )
    }

    #[test]
    fn test_navigation_saturates() {
        let mut app = sample_app();
        app.navigate_up();
        assert_eq!(app.selected_index, 0);
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_open_sell_dialog_synchronous_phase() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();

        // The dialog is visible before any fetch settles
        assert!(app.is_in_sell_dialog());

        let dialog = app.sell_dialog.as_ref().unwrap();
        assert_eq!(dialog.asset_id, 17);
        assert_eq!(dialog.asset_name, "Gold");
        assert_eq!(dialog.max_quantity, 5.0);
        assert_eq!(dialog.max_quantity_text(), "5.00");
        assert_eq!(dialog.form_action, "http://localhost:5000/assets/17/sell");
        assert_eq!(dialog.price_input, "");
        assert!(dialog.price_locked);
        assert_eq!(dialog.status, PriceStatus::Fetching);
        assert_eq!(dialog.status.text(), "Fetching current price...");
        assert_eq!(dialog.status.tone(), Tone::Muted);
    }

    #[test]
    fn test_max_quantity_two_decimals() {
        let mut app = sample_app();
        app.navigate_down();
        app.open_sell_dialog().unwrap();

        let dialog = app.sell_dialog.as_ref().unwrap();
        assert_eq!(dialog.max_quantity, 3.1);
        assert_eq!(dialog.max_quantity_text(), "3.10");
    }

    #[test]
    fn test_form_action_per_asset() {
        let mut app = sample_app();
        app.navigate_down();
        app.open_sell_dialog().unwrap();
        assert_eq!(
            app.sell_dialog.as_ref().unwrap().form_action,
            "http://localhost:5000/assets/23/sell"
        );
    }

    #[test]
    fn test_price_outcome_success() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.apply_price_outcome("Gold", PriceOutcome::Price(42.5));

        let dialog = app.sell_dialog.as_ref().unwrap();
        assert_eq!(dialog.price_input, "42.50");
        assert!(dialog.price_locked);
        assert_eq!(dialog.status.text(), "Current market price for Gold");
        assert_eq!(dialog.status.tone(), Tone::Success);
    }

    #[test]
    fn test_price_outcome_unavailable() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.apply_price_outcome("Gold", PriceOutcome::Unavailable);

        let dialog = app.sell_dialog.as_ref().unwrap();
        assert_eq!(dialog.price_input, "");
        assert!(!dialog.price_locked);
        assert_eq!(
            dialog.status.text(),
            "Could not fetch price. Please enter manually."
        );
        assert_eq!(dialog.status.tone(), Tone::Warning);
    }

    #[test]
    fn test_price_outcome_failed() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.apply_price_outcome("Gold", PriceOutcome::Failed);

        let dialog = app.sell_dialog.as_ref().unwrap();
        assert_eq!(dialog.price_input, "");
        assert!(!dialog.price_locked);
        assert_eq!(
            dialog.status.text(),
            "Could not fetch price. Please enter manually."
        );
        // Same text as NoPrice but a harder visual state
        assert_eq!(dialog.status.tone(), Tone::Danger);
    }

    #[test]
    fn test_reopen_resets_dialog_state() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.apply_price_outcome("Gold", PriceOutcome::Failed);

        // Reopen: a fresh, independent lookup starts
        app.open_sell_dialog().unwrap();
        let dialog = app.sell_dialog.as_ref().unwrap();
        assert_eq!(dialog.status, PriceStatus::Fetching);
        assert_eq!(dialog.price_input, "");
        assert!(dialog.price_locked);
    }

    #[test]
    fn test_late_outcome_still_lands() {
        // No cancellation: a result from a previous lookup overwrites the
        // fields of the dialog opened afterwards. Last write wins.
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.open_sell_dialog().unwrap();
        app.apply_price_outcome("Gold", PriceOutcome::Price(10.0));
        assert_eq!(app.sell_dialog.as_ref().unwrap().price_input, "10.00");
    }

    #[test]
    fn test_locked_price_input_ignores_edits() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.toggle_sell_focus();
        app.sell_input_char('9');
        assert_eq!(app.sell_dialog.as_ref().unwrap().price_input, "");

        // Unlocked after a failed lookup, edits go through
        app.apply_price_outcome("Gold", PriceOutcome::Failed);
        app.sell_input_char('9');
        app.sell_input_char('.');
        app.sell_input_char('5');
        assert_eq!(app.sell_dialog.as_ref().unwrap().price_input, "9.5");
        app.sell_input_backspace();
        assert_eq!(app.sell_dialog.as_ref().unwrap().price_input, "9.");
    }

    #[test]
    fn test_sell_order_validation() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.apply_price_outcome("Gold", PriceOutcome::Price(2000.0));

        // Empty quantity
        assert!(app.sell_order().is_err());

        app.sell_input_char('2');
        let order = app.sell_order().unwrap();
        assert_eq!(order.quantity, 2.0);
        assert_eq!(order.unit_price, 2000.0);
        assert_eq!(order.note, "Sold 2 units of Gold");

        // Above the held quantity
        app.sell_input_char('0');
        assert!(app.sell_order().is_err());
    }

    #[test]
    fn test_apply_sell_drops_emptied_positions() {
        let mut app = sample_app();
        app.apply_sell(17, 5.0);
        assert_eq!(app.holdings.len(), 1);
        assert_eq!(app.holdings[0].id, 23);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_close_dialog_returns_to_dashboard() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        app.close_sell_dialog();
        assert!(app.is_on_dashboard());
        assert!(app.sell_dialog.is_none());
    }
}
