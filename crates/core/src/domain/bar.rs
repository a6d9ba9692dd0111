use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Daily bars of a single symbol, ascending by date with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarSeries {
    bars: Vec<PriceBar>,
}

impl BarSeries {
    /// Sorts by date and keeps the first bar seen for each date.
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn as_slice(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.iter().position(|b| b.date == date)
    }

    /// Bars with `from <= date <= to`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> &[PriceBar] {
        let start = self.bars.partition_point(|b| b.date < from);
        let end = self.bars.partition_point(|b| b.date <= to);
        if start >= end {
            return &[];
        }
        &self.bars[start..end]
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

impl From<Vec<PriceBar>> for BarSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}

#[cfg(test)]
pub(crate) fn bar(date: &str, high: Decimal, low: Decimal) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: low,
        high,
        low,
        close: high,
        volume: Decimal::ZERO,
    }
}
