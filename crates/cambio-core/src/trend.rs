//! Day-over-day and year-over-year derivations for one series.
//!
//! Both functions take a cleaned history (see [`clean`](crate::clean)) and
//! sort it defensively, so provider ordering is never trusted blindly.

use serde::Serialize;

use crate::cleaner::chronological;
use crate::{DataPoint, ObservationDate, SectionError, SeriesName};

/// Day-over-day movement. A zero delta is reported as `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub series: SeriesName,
    pub current_value: f64,
    pub previous_value: f64,
    pub delta: f64,
    pub pct_change: String,
    pub direction: Direction,
    /// Last `window` values, oldest first.
    pub history: Vec<f64>,
    pub week_start_date: ObservationDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualContext {
    pub series: SeriesName,
    pub value_year_ago: f64,
    pub date_year_ago: ObservationDate,
    pub current_value: f64,
    pub annual_variation: String,
}

/// Compares the two most recent points and exposes a rolling window.
pub fn daily_trend(
    series: SeriesName,
    history: Vec<DataPoint>,
    window: usize,
) -> Result<DailyTrend, SectionError> {
    let history = chronological(history);
    let [.., previous, actual] = history.as_slice() else {
        return Err(SectionError::InsufficientData {
            required: 2,
            available: history.len(),
        });
    };

    let delta = actual.value - previous.value;
    let pct = percent_change(previous.value, actual.value, "daily trend")?;
    let direction = if delta > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    let tail = &history[history.len().saturating_sub(window.max(1))..];
    let week_start_date = tail.first().map_or(previous.date, |point| point.date);

    Ok(DailyTrend {
        series,
        current_value: actual.value,
        previous_value: previous.value,
        delta: round_to(delta, 4),
        pct_change: format_pct(pct),
        direction,
        history: tail.iter().map(|point| point.value).collect(),
        week_start_date,
    })
}

/// Year-over-year variation against the last valid point of a trailing
/// window that ends roughly one year ago.
pub fn annual_context(
    series: SeriesName,
    prior_window: Vec<DataPoint>,
    current: Option<f64>,
) -> Result<AnnualContext, SectionError> {
    let prior_window = chronological(prior_window);
    let Some(past) = prior_window.last() else {
        return Err(SectionError::InsufficientData {
            required: 1,
            available: 0,
        });
    };
    let Some(current) = current else {
        return Err(SectionError::InsufficientData {
            required: 1,
            available: 0,
        });
    };

    let pct = percent_change(past.value, current, "annual variation")?;

    Ok(AnnualContext {
        series,
        value_year_ago: past.value,
        date_year_ago: past.date,
        current_value: current,
        annual_variation: format_pct(pct),
    })
}

/// `(to - from) / from * 100`, refusing a zero base.
pub fn percent_change(from: f64, to: f64, context: &'static str) -> Result<f64, SectionError> {
    if from == 0.0 {
        return Err(SectionError::DivisionByZero { context });
    }
    Ok((to - from) / from * 100.0)
}

/// Half-away-from-zero rounding; never yields negative zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Percentage string with two decimals, e.g. `"11.11%"`.
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", round_to(value, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> SeriesName {
        SeriesName::parse("USD_FIX").expect("name")
    }

    fn history(values: &[f64]) -> Vec<DataPoint> {
        let start = ObservationDate::parse("2026-10-01").expect("date");
        values
            .iter()
            .enumerate()
            .map(|(offset, value)| {
                let date = ObservationDate::from_date(
                    start.into_inner() + time::Duration::days(offset as i64),
                );
                DataPoint::new(date, *value)
            })
            .collect()
    }

    #[test]
    fn rising_day_is_up() {
        let trend = daily_trend(series(), history(&[100.00, 100.50]), 5).expect("trend");
        assert_eq!(trend.delta, 0.5);
        assert_eq!(trend.pct_change, "0.50%");
        assert_eq!(trend.direction, Direction::Up);
    }

    #[test]
    fn falling_day_is_down() {
        let trend = daily_trend(series(), history(&[100.50, 100.00]), 5).expect("trend");
        assert_eq!(trend.delta, -0.5);
        assert_eq!(trend.pct_change, "-0.50%");
        assert_eq!(trend.direction, Direction::Down);
    }

    #[test]
    fn flat_day_is_down() {
        let trend = daily_trend(series(), history(&[100.00, 100.00]), 5).expect("trend");
        assert_eq!(trend.delta, 0.0);
        assert_eq!(trend.pct_change, "0.00%");
        assert_eq!(trend.direction, Direction::Down);
    }

    #[test]
    fn window_keeps_last_points_and_start_date() {
        let trend = daily_trend(series(), history(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]), 5)
            .expect("trend");
        assert_eq!(trend.history, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(trend.week_start_date.format_iso(), "2026-10-03");
        assert_eq!(trend.current_value, 7.0);
        assert_eq!(trend.previous_value, 6.0);
    }

    #[test]
    fn single_point_is_insufficient() {
        let err = daily_trend(series(), history(&[18.0]), 5).expect_err("must fail");
        assert_eq!(
            err,
            SectionError::InsufficientData {
                required: 2,
                available: 1
            }
        );
    }

    #[test]
    fn zero_previous_value_is_guarded() {
        let err = daily_trend(series(), history(&[0.0, 1.0]), 5).expect_err("must fail");
        assert!(matches!(err, SectionError::DivisionByZero { .. }));
    }

    #[test]
    fn annual_variation_is_formatted() {
        let context =
            annual_context(series(), history(&[17.90, 18.00]), Some(20.00)).expect("context");
        assert_eq!(context.annual_variation, "11.11%");
        assert_eq!(context.value_year_ago, 18.00);
        assert_eq!(context.date_year_ago.format_iso(), "2026-10-02");
    }

    #[test]
    fn annual_without_prior_points_is_insufficient() {
        let err = annual_context(series(), Vec::new(), Some(20.0)).expect_err("must fail");
        assert!(matches!(err, SectionError::InsufficientData { .. }));
    }

    #[test]
    fn annual_without_current_value_is_insufficient() {
        let err = annual_context(series(), history(&[18.0]), None).expect_err("must fail");
        assert!(matches!(err, SectionError::InsufficientData { .. }));
    }

    #[test]
    fn rounding_avoids_negative_zero() {
        assert_eq!(format_pct(-0.0001), "0.00%");
        assert_eq!(round_to(2.3456, 2), 2.35);
    }
}
