// ============================================================================
// Structure : AllocationSeries
// ============================================================================
// Asset allocation as parallel label/value/color sequences, the input of the
// allocation chart and its legend. labels[i], values[i] and colors[i] belong
// together; ordering carries no meaning beyond that correspondence.
// ============================================================================

use crate::models::Holding;

/// 24-bit chart color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SliceColor {
    pub const GOLD: SliceColor = SliceColor::new(0xFF, 0xD7, 0x00);
    pub const SILVER: SliceColor = SliceColor::new(0xC0, 0xC0, 0xC0);
    pub const STOCK_BLUE: SliceColor = SliceColor::new(0x4E, 0x73, 0xDF);
    pub const REAL_ESTATE_GREEN: SliceColor = SliceColor::new(0x1C, 0xC8, 0x8A);
    pub const FOREX_CYAN: SliceColor = SliceColor::new(0x36, 0xB9, 0xCC);
    pub const COMMODITY_YELLOW: SliceColor = SliceColor::new(0xF6, 0xC2, 0x3E);
    pub const NEUTRAL_GRAY: SliceColor = SliceColor::new(0x85, 0x87, 0x96);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Allocation series feeding the chart and the legend.
#[derive(Debug, Clone, Default)]
pub struct AllocationSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<SliceColor>,
}

impl AllocationSeries {
    /// Builds the series by grouping market value per holding name.
    ///
    /// Insertion order is preserved: the first holding with a given name
    /// decides where that slice sits and which color it gets.
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let mut series = AllocationSeries::default();

        for holding in holdings {
            match series.labels.iter().position(|l| l == &holding.name) {
                Some(i) => series.values[i] += holding.market_value(),
                None => {
                    series.labels.push(holding.name.clone());
                    series.values.push(holding.market_value());
                    series.colors.push(holding.chart_color());
                }
            }
        }

        series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Iterates over (label, value, color), bounded by the shortest sequence.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64, SliceColor)> {
        self.labels
            .iter()
            .zip(&self.values)
            .zip(&self.colors)
            .map(|((label, &value), &color)| (label.as_str(), value, color))
    }
}

// ============================================================================
// Display formatting
// ============================================================================

/// Formats a value with thousands separators, dropping the fraction.
///
/// 1234 -> "1,234". Matches the locale rendering of the chart tooltip.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Formats a value with exactly two decimal places (5 -> "5.00").
pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetType;

    fn sample_holdings() -> Vec<Holding> {
        vec![
            Holding::new(1, "Apple Inc.", "AAPL", AssetType::Stock, 10.0, 250.0),
            Holding::new(2, "Gold", "XAU/USD", AssetType::Commodity, 2.0, 2000.0),
            Holding::new(3, "Euro", "EUR/USD", AssetType::Forex, 500.0, 1.1),
        ]
    }

    #[test]
    fn test_from_holdings_preserves_order() {
        let series = AllocationSeries::from_holdings(&sample_holdings());
        assert_eq!(series.labels, vec!["Apple Inc.", "Gold", "Euro"]);
        assert_eq!(series.values, vec![2500.0, 4000.0, 550.0]);
        assert_eq!(
            series.colors,
            vec![
                SliceColor::STOCK_BLUE,
                SliceColor::GOLD,
                SliceColor::FOREX_CYAN
            ]
        );
    }

    #[test]
    fn test_from_holdings_groups_by_name() {
        let mut holdings = sample_holdings();
        // Second "Gold" position merges into the existing slice
        holdings.push(Holding::new(4, "Gold", "GLD", AssetType::Stock, 1.0, 500.0));

        let series = AllocationSeries::from_holdings(&holdings);
        assert_eq!(series.len(), 3);
        assert_eq!(series.values[1], 4500.0);
        // Color of the first occurrence wins
        assert_eq!(series.colors[1], SliceColor::GOLD);
    }

    #[test]
    fn test_empty_holdings() {
        let series = AllocationSeries::from_holdings(&[]);
        assert!(series.is_empty());
        assert_eq!(series.entries().count(), 0);
        assert_eq!(series.total(), 0.0);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1234.0), "1,234");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(-1234.0), "-1,234");
        // Fraction is rounded away, not truncated
        assert_eq!(format_thousands(999.6), "1,000");
    }

    #[test]
    fn test_format_fixed2() {
        assert_eq!(format_fixed2(5.0), "5.00");
        assert_eq!(format_fixed2(3.1), "3.10");
        assert_eq!(format_fixed2(42.5), "42.50");
        assert_eq!(format_fixed2(0.005), "0.01");
    }
}
