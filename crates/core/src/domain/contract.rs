use crate::domain::alert::{Alert, OptionKind};
use crate::error::ParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// One alert row exactly as it appears in the alerts file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAlertRecord {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Sym")]
    pub sym: String,
    #[serde(rename = "Strike")]
    pub strike: String,
    #[serde(rename = "Spot")]
    pub spot: String,
    #[serde(rename = "C/P")]
    pub call_put: String,
    #[serde(rename = "Exp")]
    pub exp: String,
    #[serde(rename = "Orders")]
    pub orders: String,
    #[serde(rename = "Vol")]
    pub vol: String,
    #[serde(rename = "Prems")]
    pub prems: String,
    #[serde(rename = "ITM")]
    pub itm: String,
}

impl RawAlertRecord {
    pub fn validate_and_into_alert(self) -> Result<Alert, ParseError> {
        let symbol = self.sym.trim().to_string();
        if symbol.is_empty() {
            return Err(ParseError::EmptySymbol);
        }

        let kind = match self.call_put.trim().to_ascii_lowercase().as_str() {
            "call" => OptionKind::Call,
            "put" => OptionKind::Put,
            _ => return Err(ParseError::InvalidOptionKind(self.call_put)),
        };

        Ok(Alert {
            symbol,
            alert_time: parse_timestamp("Time", &self.time)?,
            expiration: parse_date("Exp", &self.exp)?,
            strike: expand_magnitude("Strike", &self.strike)?,
            spot: expand_magnitude("Spot", &self.spot)?,
            kind,
            orders: expand_magnitude("Orders", &self.orders)?,
            volume: expand_magnitude("Vol", &self.vol)?,
            premiums: expand_magnitude("Prems", &self.prems)?,
            in_the_money: self.itm.trim() == "1",
        })
    }
}

/// Expands human-formatted quantities: "1.2K" -> 1200, "3.4M" -> 3400000, "45.671" -> 45.67.
///
/// The leading numeric portion is rounded to cents before any multiplier is applied,
/// and K/M amounts are then rounded to whole units. The result always carries a
/// scale of 2.
pub fn expand_magnitude(field: &'static str, raw: &str) -> Result<Decimal, ParseError> {
    let s = raw.trim();
    let invalid = || ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    };

    let number = leading_number(s).ok_or_else(invalid)?;
    let value = Decimal::from_str(&number).map_err(|_| invalid())?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ParseError::NegativeNumber {
            field,
            value: raw.to_string(),
        });
    }

    let value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let multiplier = if s.contains('K') {
        Some(Decimal::from(1_000))
    } else if s.contains('M') {
        Some(Decimal::from(1_000_000))
    } else {
        None
    };

    let mut out = match multiplier {
        Some(m) => value
            .checked_mul(m)
            .ok_or_else(invalid)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        None => value,
    };
    out.rescale(2);
    Ok(out)
}

/// Longest prefix that reads as a plain decimal: optional sign, digits, optional fraction.
fn leading_number(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut out = String::new();

    if let Some(&c) = bytes.first() {
        if c == b'-' || c == b'+' {
            if c == b'-' {
                out.push('-');
            }
            i += 1;
        }
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &s[frac_start..j];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    out.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(frac_digits);
    }
    Some(out)
}

pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<NaiveDateTime, ParseError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.and_time(NaiveTime::MIN));
        }
    }

    Err(ParseError::InvalidTimestamp {
        field,
        value: raw.to_string(),
    })
}

pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ParseError> {
    parse_timestamp(field, raw).map(|dt| dt.date())
}
