use crate::domain::PriceBar;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min_low: Decimal,
    pub max_high: Decimal,
}

/// Lowest low and highest high over the window; `None` for an empty window.
pub fn price_range(window: &[PriceBar]) -> Option<PriceRange> {
    let first = window.first()?;
    let init = PriceRange {
        min_low: first.low,
        max_high: first.high,
    };

    Some(window[1..].iter().fold(init, |acc, bar| PriceRange {
        min_low: acc.min_low.min(bar.low),
        max_high: acc.max_high.max(bar.high),
    }))
}
