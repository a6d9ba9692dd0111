use crate::domain::{Alert, BarSeries, PriceBar};

/// Bars from the alert date through the expiration date, both inclusive.
///
/// If no bar falls on the alert date the window is empty. If no bar falls on the
/// expiration date (still open, or expiring on a day without a session) the window
/// runs to the end of the series, so a breach after expiration is still found.
pub fn select_window<'a>(series: &'a BarSeries, alert: &Alert) -> &'a [PriceBar] {
    let Some(start) = series.position_of(alert.alert_date()) else {
        return &[];
    };

    let bars = series.as_slice();
    match series.position_of(alert.expiration) {
        Some(end) if end < start => &[],
        Some(end) => &bars[start..=end],
        None => &bars[start..],
    }
}

/// The leading part of `window` dated on or before expiration. Price extremes are
/// taken over this slice only.
pub fn bounded_by_expiration<'a>(window: &'a [PriceBar], alert: &Alert) -> &'a [PriceBar] {
    &window[..window.partition_point(|b| b.date <= alert.expiration)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::bar;
    use crate::domain::OptionKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn alert(time: &str, exp: &str) -> Alert {
        Alert {
            symbol: "XYZ".to_string(),
            alert_time: d(time).and_hms_opt(14, 45, 0).unwrap(),
            expiration: d(exp),
            strike: dec!(100),
            spot: dec!(90),
            kind: OptionKind::Call,
            orders: dec!(1),
            volume: dec!(1),
            premiums: dec!(1),
            in_the_money: false,
        }
    }

    fn series(dates: &[&str]) -> BarSeries {
        BarSeries::new(dates.iter().map(|s| bar(s, dec!(1), dec!(1))).collect())
    }

    fn dates(window: &[PriceBar]) -> Vec<NaiveDate> {
        window.iter().map(|b| b.date).collect()
    }

    #[test]
    fn spans_alert_date_through_expiration() {
        let s = series(&["2023-01-02", "2023-01-03", "2023-01-04", "2023-01-05", "2023-01-06"]);
        let w = select_window(&s, &alert("2023-01-03", "2023-01-05"));
        assert_eq!(dates(w), vec![d("2023-01-03"), d("2023-01-04"), d("2023-01-05")]);
    }

    #[test]
    fn open_alert_runs_to_end_of_series() {
        let s = series(&["2023-01-03", "2023-01-04"]);
        let w = select_window(&s, &alert("2023-01-03", "2023-01-20"));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn expiration_without_a_session_scans_to_end_of_series() {
        // 2023-01-16 is a market holiday; bars continue afterwards.
        let s = series(&["2023-01-12", "2023-01-13", "2023-01-17", "2023-01-18"]);
        let a = alert("2023-01-12", "2023-01-16");
        let w = select_window(&s, &a);
        assert_eq!(
            dates(w),
            vec![d("2023-01-12"), d("2023-01-13"), d("2023-01-17"), d("2023-01-18")]
        );
        assert_eq!(
            dates(bounded_by_expiration(w, &a)),
            vec![d("2023-01-12"), d("2023-01-13")]
        );
    }

    #[test]
    fn bounding_keeps_a_window_that_ends_on_expiration() {
        let s = series(&["2023-01-03", "2023-01-04", "2023-01-05"]);
        let a = alert("2023-01-03", "2023-01-04");
        let w = select_window(&s, &a);
        assert_eq!(bounded_by_expiration(w, &a), w);
    }

    #[test]
    fn missing_alert_date_bar_yields_empty_window() {
        // Alert fired on a Saturday; there is no bar for it.
        let s = series(&["2023-01-06", "2023-01-09"]);
        assert!(select_window(&s, &alert("2023-01-07", "2023-01-09")).is_empty());
    }

    #[test]
    fn expiration_before_alert_yields_empty_window() {
        let s = series(&["2023-01-03", "2023-01-04", "2023-01-05"]);
        assert!(select_window(&s, &alert("2023-01-05", "2023-01-03")).is_empty());
    }

    #[test]
    fn same_day_expiration_is_a_single_bar() {
        let s = series(&["2023-01-03", "2023-01-04"]);
        let w = select_window(&s, &alert("2023-01-04", "2023-01-04"));
        assert_eq!(dates(w), vec![d("2023-01-04")]);
    }

    #[test]
    fn bounded_window_never_leaves_alert_to_expiration_range() {
        let all = [
            "2023-01-02", "2023-01-03", "2023-01-04", "2023-01-05", "2023-01-06", "2023-01-09",
        ];
        let s = series(&all);
        // The weekend expirations have no bar of their own.
        let exps = all.iter().chain(["2023-01-07", "2023-01-08"].iter());
        for start in &all {
            for exp in exps.clone() {
                let a = alert(start, exp);
                for b in bounded_by_expiration(select_window(&s, &a), &a) {
                    assert!(a.alert_date() <= b.date && b.date <= a.expiration);
                }
            }
        }
    }
}
