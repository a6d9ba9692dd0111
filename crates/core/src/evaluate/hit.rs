use crate::domain::{Alert, OptionKind, PriceBar};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Direction in which a bar must cross the strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breach {
    /// Out-of-the-money call: the day's high reaches the strike.
    HighAtOrAbove(Decimal),
    /// Put struck at or below spot: the day's low reaches the strike.
    LowAtOrBelow(Decimal),
}

impl Breach {
    /// `None` when the call/put and strike/spot combination is not evaluated.
    pub fn for_alert(alert: &Alert) -> Option<Self> {
        match alert.kind {
            OptionKind::Call if alert.strike > alert.spot => Some(Breach::HighAtOrAbove(alert.strike)),
            OptionKind::Put if alert.strike <= alert.spot => Some(Breach::LowAtOrBelow(alert.strike)),
            _ => None,
        }
    }

    pub fn is_breached_by(&self, bar: &PriceBar) -> bool {
        match *self {
            Breach::HighAtOrAbove(strike) => bar.high >= strike,
            Breach::LowAtOrBelow(strike) => bar.low <= strike,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub ignored: bool,
    /// Zero-based index into the window of the first breaching bar.
    pub days_to_hit: Option<usize>,
    pub expired: bool,
}

impl HitOutcome {
    pub fn hit(&self) -> bool {
        self.days_to_hit.is_some()
    }
}

/// Scans `window` in date order for the first strike breach.
///
/// `as_of` is the evaluation date; it only matters for alerts that were not hit.
pub fn evaluate_hit(window: &[PriceBar], alert: &Alert, as_of: NaiveDate) -> HitOutcome {
    let breach = match Breach::for_alert(alert) {
        Some(b) if !window.is_empty() => b,
        _ => {
            return HitOutcome {
                ignored: true,
                days_to_hit: None,
                expired: as_of > alert.expiration,
            }
        }
    };

    match window.iter().position(|bar| breach.is_breached_by(bar)) {
        Some(idx) => HitOutcome {
            ignored: false,
            days_to_hit: Some(idx),
            expired: window[idx].date > alert.expiration,
        },
        None => HitOutcome {
            ignored: false,
            days_to_hit: None,
            expired: as_of > alert.expiration,
        },
    }
}
