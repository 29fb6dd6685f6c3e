use serde::Serialize;

use crate::trend::round_to;

/// Default deviation, in cents, that raises the alert.
pub const DEFAULT_ALERT_THRESHOLD_CENTS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonitorSense {
    Depreciation,
    Appreciation,
}

/// Deviation of the regional provider's rate from the official rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorBlock {
    pub abs_diff_cents: f64,
    pub diff_cents: f64,
    pub alert_active: bool,
    pub sense: MonitorSense,
    pub official_value: f64,
    pub regional_value: f64,
    pub threshold_cents: f64,
}

pub fn monitor(official: f64, regional: f64, threshold_cents: f64) -> MonitorBlock {
    let diff_cents = round_to((regional - official) * 100.0, 2);

    MonitorBlock {
        abs_diff_cents: diff_cents.abs(),
        diff_cents,
        alert_active: diff_cents.abs() >= threshold_cents,
        sense: if diff_cents > 0.0 {
            MonitorSense::Depreciation
        } else {
            MonitorSense::Appreciation
        },
        official_value: official,
        regional_value: regional,
        threshold_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheaper_regional_rate_is_appreciation_alert() {
        let block = monitor(20.00, 19.80, DEFAULT_ALERT_THRESHOLD_CENTS);
        assert_eq!(block.diff_cents, -20.0);
        assert_eq!(block.abs_diff_cents, 20.0);
        assert!(block.alert_active);
        assert_eq!(block.sense, MonitorSense::Appreciation);
    }

    #[test]
    fn small_deviation_stays_quiet() {
        let block = monitor(18.40, 18.45, DEFAULT_ALERT_THRESHOLD_CENTS);
        assert_eq!(block.diff_cents, 5.0);
        assert!(!block.alert_active);
        assert_eq!(block.sense, MonitorSense::Depreciation);
    }

    #[test]
    fn deviation_at_threshold_alerts() {
        let block = monitor(18.00, 18.10, DEFAULT_ALERT_THRESHOLD_CENTS);
        assert_eq!(block.diff_cents, 10.0);
        assert!(block.alert_active);
    }
}
