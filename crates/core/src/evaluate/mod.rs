pub mod hit;
pub mod range;
pub mod window;

pub use hit::{evaluate_hit, Breach, HitOutcome};
pub use range::{price_range, PriceRange};
pub use window::{bounded_by_expiration, select_window};

use crate::domain::{Alert, BarSeries};
use chrono::NaiveDate;

/// An alert together with everything derived from its trading window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvaluation {
    pub alert: Alert,
    pub outcome: HitOutcome,
    pub range: Option<PriceRange>,
}

pub fn evaluate_alert(series: &BarSeries, alert: Alert, as_of: NaiveDate) -> AlertEvaluation {
    let window = select_window(series, &alert);
    let outcome = evaluate_hit(window, &alert, as_of);
    let range = price_range(bounded_by_expiration(window, &alert));

    AlertEvaluation {
        alert,
        outcome,
        range,
    }
}
