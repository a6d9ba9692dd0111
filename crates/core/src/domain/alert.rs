use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    pub fn label(self) -> &'static str {
        match self {
            OptionKind::Call => "Call",
            OptionKind::Put => "Put",
        }
    }
}

/// Canonical alert, after normalization of the raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub symbol: String,
    pub alert_time: NaiveDateTime,
    pub expiration: NaiveDate,
    pub strike: Decimal,
    pub spot: Decimal,
    pub kind: OptionKind,
    pub orders: Decimal,
    pub volume: Decimal,
    pub premiums: Decimal,
    pub in_the_money: bool,
}

impl Alert {
    pub fn alert_date(&self) -> NaiveDate {
        self.alert_time.date()
    }

    pub fn is_call(&self) -> bool {
        self.kind == OptionKind::Call
    }
}
