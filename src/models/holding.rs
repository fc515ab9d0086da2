// ============================================================================
// Structure : Holding
// ============================================================================
// One asset position in the portfolio, as reported by the backend.
// ============================================================================

use crate::models::allocation::SliceColor;

/// Asset categories recognized by the backend.
///
/// The display labels must match the backend's category strings exactly:
/// they travel in the price-lookup URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Stock,
    Forex,
    Commodity,
    RealEstate,
    Other,
}

impl AssetType {
    /// Backend category string (also the display label).
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Stock => "Stock",
            AssetType::Forex => "Forex",
            AssetType::Commodity => "Commodity",
            AssetType::RealEstate => "Real Estate",
            AssetType::Other => "Other",
        }
    }

    /// Default chart color for this category.
    pub fn color(&self) -> SliceColor {
        match self {
            AssetType::Stock => SliceColor::STOCK_BLUE,
            AssetType::Forex => SliceColor::FOREX_CYAN,
            AssetType::Commodity => SliceColor::COMMODITY_YELLOW,
            AssetType::RealEstate => SliceColor::REAL_ESTATE_GREEN,
            AssetType::Other => SliceColor::NEUTRAL_GRAY,
        }
    }
}

/// One position held by the user.
#[derive(Debug, Clone)]
pub struct Holding {
    /// Backend identifier, used to build the sell endpoint path.
    pub id: u64,

    /// Display name (ex: "Apple Inc.", "Gold").
    pub name: String,

    /// Ticker symbol (ex: "AAPL", "XAU/USD").
    pub symbol: String,

    /// Category, used for price lookup and default colors.
    pub asset_type: AssetType,

    /// Units held. Upper bound for a sell order.
    pub quantity: f64,

    /// Current value of one unit, in the user's base currency.
    pub unit_value: f64,
}

impl Holding {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        symbol: impl Into<String>,
        asset_type: AssetType,
        quantity: f64,
        unit_value: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            symbol: symbol.into(),
            asset_type,
            quantity,
            unit_value,
        }
    }

    /// Total value of the position.
    pub fn market_value(&self) -> f64 {
        self.quantity * self.unit_value
    }

    /// Chart color for this holding.
    ///
    /// Precious metals keep their traditional colors regardless of how the
    /// position is categorized (a gold ETF is a Stock but still renders gold).
    pub fn chart_color(&self) -> SliceColor {
        let name = self.name.to_lowercase();
        if name.contains("gold") || name.contains("gld") || name.contains("xau") {
            SliceColor::GOLD
        } else if name.contains("silver") || name.contains("slv") || name.contains("xag") {
            SliceColor::SILVER
        } else {
            self.asset_type.color()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_value() {
        let holding = Holding::new(1, "Apple Inc.", "AAPL", AssetType::Stock, 10.0, 250.0);
        assert_eq!(holding.market_value(), 2500.0);
    }

    #[test]
    fn test_category_colors() {
        let stock = Holding::new(1, "Apple Inc.", "AAPL", AssetType::Stock, 1.0, 1.0);
        assert_eq!(stock.chart_color(), SliceColor::STOCK_BLUE);

        let forex = Holding::new(2, "Euro", "EUR/USD", AssetType::Forex, 1.0, 1.0);
        assert_eq!(forex.chart_color(), SliceColor::FOREX_CYAN);

        let estate = Holding::new(3, "Flat", "FLAT", AssetType::RealEstate, 1.0, 1.0);
        assert_eq!(estate.chart_color(), SliceColor::REAL_ESTATE_GREEN);
    }

    #[test]
    fn test_precious_metal_colors_override_category() {
        // A gold ETF is a Stock, but renders with the gold color
        let gld = Holding::new(1, "SPDR Gold Shares", "GLD", AssetType::Stock, 1.0, 1.0);
        assert_eq!(gld.chart_color(), SliceColor::GOLD);

        let xau = Holding::new(2, "XAU Spot", "XAU/USD", AssetType::Commodity, 1.0, 1.0);
        assert_eq!(xau.chart_color(), SliceColor::GOLD);
    }

    #[test]
    fn test_silver_color() {
        let silver = Holding::new(1, "Silver Bars", "XAG", AssetType::Commodity, 1.0, 1.0);
        assert_eq!(silver.chart_color(), SliceColor::SILVER);
    }

    #[test]
    fn test_asset_type_labels_match_backend() {
        assert_eq!(AssetType::RealEstate.label(), "Real Estate");
        assert_eq!(AssetType::Stock.label(), "Stock");
    }
}
