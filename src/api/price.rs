// ============================================================================
// API Client : price lookup
// ============================================================================
// Asks the backend for the latest market price of a symbol. The backend
// answers `{"price": 123.45, "symbol": "..."}` on success and an `{"error"}`
// body with a non-2xx status when no price source is available.
// ============================================================================

use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::models::AssetType;

/// Price payload returned by `GET /api/price/{symbol}/{asset_type}`.
///
/// Extra keys (`symbol`, `error`) are ignored; a missing or null `price`
/// deserializes to `None`.
#[derive(Debug, Deserialize)]
pub struct PriceResponse {
    pub price: Option<f64>,
}

/// Builds the price endpoint URL with both path segments percent-encoded.
///
/// Forex and commodity symbols contain slashes ("EUR/USD", "XAU/USD") and the
/// asset type label may contain a space ("Real Estate"), so neither segment
/// can be embedded raw.
pub fn build_price_url(base_url: &str, symbol: &str, asset_type: AssetType) -> String {
    format!(
        "{}/api/price/{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(symbol, NON_ALPHANUMERIC),
        utf8_percent_encode(asset_type.label(), NON_ALPHANUMERIC),
    )
}

/// Fetches the latest price for a symbol from the backend.
///
/// Exactly one request, no retry, no client-side timeout. The three outcomes
/// the caller must distinguish:
/// - `Ok(Some(price))` : usable price (present and positive)
/// - `Ok(None)` : the backend answered but has no price; manual entry
/// - `Err(_)` : transport or parse failure
#[instrument(skip(client, base_url), fields(asset_type = asset_type.label()))]
pub async fn fetch_latest_price(
    client: &reqwest::Client,
    base_url: &str,
    symbol: &str,
    asset_type: AssetType,
) -> Result<Option<f64>> {
    let url = build_price_url(base_url, symbol, asset_type);
    debug!(url = %url, "Requesting latest price");

    let response = client
        .get(&url)
        .send()
        .await
        .context("Price request failed")?;

    let status = response.status();
    debug!(status = %status, "Received price response");

    // The backend answers 404 with an {"error"} JSON body when no price
    // source is available. Any status whose body parses as JSON counts as a
    // settled answer; only transport and parse failures are hard errors.
    let payload: PriceResponse = response
        .json()
        .await
        .context("Failed to parse price response JSON")?;

    match payload.price {
        Some(price) if price > 0.0 => {
            info!(price, "Fetched latest price");
            Ok(Some(price))
        }
        Some(price) => {
            warn!(price, "Backend returned a non-positive price, ignoring");
            Ok(None)
        }
        None => {
            info!("Price response carried no price");
            Ok(None)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
