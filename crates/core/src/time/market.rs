use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Date that "now" is compared against when deciding whether an unhit alert expired.
///
/// An explicit `YYYY-MM-DD` wins; otherwise it is today's date at the market's UTC offset.
pub fn resolve_evaluation_date(
    as_of_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
    market_offset: FixedOffset,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = as_of_date_arg {
        return Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?);
    }

    Ok(now_utc.with_timezone(&market_offset).date_naive())
}
