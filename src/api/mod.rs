// ============================================================================
// Module : api
// ============================================================================
// HTTP client for the portfolio-tracker backend: price lookup and sell
// order submission.
// ============================================================================

pub mod price;
pub mod sell;

pub use price::fetch_latest_price;
pub use sell::{sell_form_action, submit_sell_order, SellOrder};
