// ============================================================================
// API Client : sell orders
// ============================================================================
// Submits a sell order to the backend. The sell endpoint is the classic
// HTML-form route `POST /assets/{id}/sell`, so the body is form-encoded:
// quantity, amount (price per unit), date, note.
// ============================================================================

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

/// A sell order the user confirmed in the sell dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct SellOrder {
    /// Units to sell. Validated against the held quantity before submission.
    pub quantity: f64,

    /// Price per unit, either fetched from the backend or entered manually.
    pub unit_price: f64,

    /// Transaction date.
    pub date: NaiveDate,

    /// Free-form note, may be empty.
    pub note: String,
}

/// Builds the sell form action for an asset.
///
/// The identifier is embedded without escaping: backend asset ids are
/// numeric database keys.
pub fn sell_form_action(base_url: &str, asset_id: u64) -> String {
    format!("{}/assets/{}/sell", base_url.trim_end_matches('/'), asset_id)
}

/// Posts a sell order to its form action.
#[instrument(skip(client, order), fields(quantity = order.quantity))]
pub async fn submit_sell_order(
    client: &reqwest::Client,
    action_url: &str,
    order: &SellOrder,
) -> Result<()> {
    debug!(url = %action_url, "Submitting sell order");

    let form = [
        ("quantity", order.quantity.to_string()),
        ("amount", order.unit_price.to_string()),
        ("date", order.date.format("%Y-%m-%d").to_string()),
        ("note", order.note.clone()),
    ];

    let response = client
        .post(action_url)
        .form(&form)
        .send()
        .await
        .context("Sell order request failed")?;

    let status = response.status();
    if !status.is_success() && !status.is_redirection() {
        anyhow::bail!("Sell endpoint returned HTTP {}", status);
    }

    info!(status = %status, "Sell order accepted");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sell_form_action() {
        assert_eq!(
            sell_form_action("http://localhost:5000", 42),
            "http://localhost:5000/assets/42/sell"
        );
        // Trailing slash on the base does not double up
        assert_eq!(
            sell_form_action("http://localhost:5000/", 7),
            "http://localhost:5000/assets/7/sell"
        );
    }

    #[tokio::test]
    async fn test_submit_against_unreachable_backend_is_an_error() {
        let client = reqwest::Client::new();
        let order = SellOrder {
            quantity: 1.0,
            unit_price: 10.0,
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            note: String::new(),
        };
        let result = submit_sell_order(&client, "http://127.0.0.1:1/assets/1/sell", &order).await;
        assert!(result.is_err());
    }
}
