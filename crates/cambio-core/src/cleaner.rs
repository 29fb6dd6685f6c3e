use tracing::debug;

use crate::{DataPoint, RawObservation};

/// Filters raw observations down to valid data points.
///
/// Sentinel markers (`"N/E"`, `""`) are removed, as are values or dates that
/// do not parse. Input order is preserved; nothing is interpolated.
pub fn clean(points: &[RawObservation]) -> Vec<DataPoint> {
    let cleaned: Vec<DataPoint> = points
        .iter()
        .filter_map(|point| {
            let value = point.numeric_value()?;
            let date = point.parsed_date()?;
            Some(DataPoint::new(date, value))
        })
        .collect();

    if cleaned.len() < points.len() {
        debug!(
            dropped = points.len() - cleaned.len(),
            kept = cleaned.len(),
            "discarded unavailable observations"
        );
    }

    cleaned
}

/// Stable sort by date, oldest first.
pub fn chronological(mut points: Vec<DataPoint>) -> Vec<DataPoint> {
    points.sort_by_key(|point| point.date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> Vec<RawObservation> {
        pairs
            .iter()
            .map(|(date, value)| RawObservation::new(*date, *value))
            .collect()
    }

    #[test]
    fn removes_both_sentinels_and_keeps_order() {
        let points = raw(&[
            ("01/10/2026", "18.10"),
            ("02/10/2026", "N/E"),
            ("03/10/2026", ""),
            ("06/10/2026", "18.30"),
            ("07/10/2026", "18.20"),
        ]);

        let cleaned = clean(&points);
        let values: Vec<f64> = cleaned.iter().map(|point| point.value).collect();
        assert_eq!(values, vec![18.10, 18.30, 18.20]);
        assert_eq!(cleaned[0].date.format_iso(), "2026-10-01");
    }

    #[test]
    fn drops_unparseable_values_and_dates() {
        let points = raw(&[("01/10/2026", "abc"), ("yesterday", "18.0"), ("02/10/2026", "18.5")]);
        let cleaned = clean(&points);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].value, 18.5);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(clean(&[]).is_empty());
    }

    #[test]
    fn chronological_sorts_out_of_order_points() {
        let points = clean(&raw(&[("03/10/2026", "3"), ("01/10/2026", "1"), ("02/10/2026", "2")]));
        let sorted = chronological(points);
        let values: Vec<f64> = sorted.iter().map(|point| point.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}
