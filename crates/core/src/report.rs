use crate::error::ReportError;
use crate::evaluate::AlertEvaluation;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One flattened output line, already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "ExpirationDate")]
    pub expiration_date: String,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Strike")]
    pub strike: String,
    #[serde(rename = "Spot")]
    pub spot: String,
    #[serde(rename = "Orders")]
    pub orders: String,
    #[serde(rename = "Volume")]
    pub volume: String,
    #[serde(rename = "Prems")]
    pub prems: String,
    #[serde(rename = "ITM")]
    pub itm: String,
    #[serde(rename = "Ignored")]
    pub ignored: String,
    #[serde(rename = "Hit")]
    pub hit: String,
    #[serde(rename = "DaysUntilHit")]
    pub days_until_hit: String,
    #[serde(rename = "Expired")]
    pub expired: String,
    #[serde(rename = "MaxPrice")]
    pub max_price: String,
    #[serde(rename = "MinPrice")]
    pub min_price: String,
}

impl ReportRow {
    pub fn from_evaluation(ev: &AlertEvaluation) -> Self {
        let alert = &ev.alert;
        let outcome = &ev.outcome;

        Self {
            date: alert.alert_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            expiration_date: alert.expiration.format("%Y-%m-%d").to_string(),
            ticker: alert.symbol.clone(),
            kind: alert.kind.label().to_string(),
            strike: money(alert.strike),
            spot: money(alert.spot),
            orders: money(alert.orders),
            volume: money(alert.volume),
            prems: money(alert.premiums),
            itm: yes_no(alert.in_the_money),
            ignored: yes_no(outcome.ignored),
            hit: yes_no(outcome.hit()),
            days_until_hit: outcome
                .days_to_hit
                .map(|d| d.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            expired: yes_no(outcome.expired),
            // An empty window has no range; leave the cells blank.
            max_price: ev.range.map(|r| money(r.max_high)).unwrap_or_default(),
            min_price: ev.range.map(|r| money(r.min_low)).unwrap_or_default(),
        }
    }
}

fn yes_no(b: bool) -> String {
    if b { "YES" } else { "NO" }.to_string()
}

fn money(d: Decimal) -> String {
    let mut d = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(2);
    d.to_string()
}

/// Writes a header plus one line per row. Refuses an empty row set.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoRows);
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Replaces `path` with the report. Nothing is touched when `rows` is empty.
pub fn write_report_file(path: &Path, rows: &[ReportRow]) -> Result<(), ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoRows);
    }
    let file = std::fs::File::create(path)?;
    write_report(std::io::BufWriter::new(file), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Alert, OptionKind};
    use crate::evaluate::{HitOutcome, PriceRange};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn evaluation(outcome: HitOutcome, range: Option<PriceRange>) -> AlertEvaluation {
        AlertEvaluation {
            alert: Alert {
                symbol: "XYZ".to_string(),
                alert_time: NaiveDate::from_ymd_opt(2023, 1, 3)
                    .unwrap()
                    .and_hms_opt(10, 31, 0)
                    .unwrap(),
                expiration: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
                strike: dec!(100.00),
                spot: dec!(90.00),
                kind: OptionKind::Call,
                orders: dec!(3.00),
                volume: dec!(1200.00),
                premiums: dec!(250000.00),
                in_the_money: false,
            },
            outcome,
            range,
        }
    }

    fn hit_row() -> ReportRow {
        ReportRow::from_evaluation(&evaluation(
            HitOutcome {
                ignored: false,
                days_to_hit: Some(1),
                expired: false,
            },
            Some(PriceRange {
                min_low: dec!(85),
                max_high: dec!(102),
            }),
        ))
    }

    #[test]
    fn renders_hit_row() {
        let row = hit_row();
        assert_eq!(row.date, "2023-01-03 10:31:00");
        assert_eq!(row.expiration_date, "2023-01-10");
        assert_eq!(row.kind, "Call");
        assert_eq!(row.strike, "100.00");
        assert_eq!(row.volume, "1200.00");
        assert_eq!(row.itm, "NO");
        assert_eq!(row.ignored, "NO");
        assert_eq!(row.hit, "YES");
        assert_eq!(row.days_until_hit, "1");
        assert_eq!(row.expired, "NO");
        assert_eq!(row.max_price, "102.00");
        assert_eq!(row.min_price, "85.00");
    }

    #[test]
    fn renders_ignored_row_with_blank_range() {
        let row = ReportRow::from_evaluation(&evaluation(
            HitOutcome {
                ignored: true,
                days_to_hit: None,
                expired: true,
            },
            None,
        ));
        assert_eq!(row.ignored, "YES");
        assert_eq!(row.hit, "NO");
        assert_eq!(row.days_until_hit, "N/A");
        assert_eq!(row.expired, "YES");
        assert_eq!(row.max_price, "");
        assert_eq!(row.min_price, "");
    }

    #[test]
    fn prices_round_to_two_decimals() {
        assert_eq!(money(dec!(101.4300018)), "101.43");
        assert_eq!(money(dec!(7)), "7.00");
        assert_eq!(money(dec!(2.345)), "2.35");
    }

    #[test]
    fn writes_header_in_column_order() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[hit_row()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,ExpirationDate,Ticker,Type,Strike,Spot,Orders,Volume,Prems,ITM,Ignored,Hit,DaysUntilHit,Expired,MaxPrice,MinPrice"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2023-01-03 10:31:00,2023-01-10,XYZ,Call,100.00,90.00,3.00,1200.00,250000.00,NO,NO,YES,1,NO,102.00,85.00"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_row_set_is_rejected() {
        let mut buf = Vec::new();
        assert!(matches!(write_report(&mut buf, &[]), Err(ReportError::NoRows)));
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_report_leaves_existing_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "previous run\n").unwrap();

        let err = write_report_file(&path, &[]).unwrap_err();
        assert!(matches!(err, ReportError::NoRows));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run\n");
    }

    #[test]
    fn empty_report_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        assert!(write_report_file(&path, &[]).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn report_file_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "previous run\n").unwrap();

        write_report_file(&path, &[hit_row()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Date,ExpirationDate,"));
        assert_eq!(text.lines().count(), 2);
    }
}
