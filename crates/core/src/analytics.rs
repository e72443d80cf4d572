//! Derived statistics over grades and attendance.
//!
//! Everything here is computed on demand from whatever record set the
//! caller is authorized to see; nothing is pre-materialized. An empty
//! input always yields a defined no-data value rather than an error or a
//! synthetic zero.

use serde::{Deserialize, Serialize};

use crate::grading::{round_grade, DEFAULT_GRADE_MAX, DEFAULT_GRADE_MIN};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum number of grades before a trend projection is attempted.
pub const MIN_TREND_SAMPLES: usize = 3;

/// Slope above which a grade sequence counts as improving.
pub const IMPROVING_SLOPE: f64 = 0.5;
/// Slope below which a grade sequence counts as declining.
pub const DECLINING_SLOPE: f64 = -0.5;

/// Default trailing window for attendance rates, in days.
pub const DEFAULT_ATTENDANCE_WINDOW_DAYS: u32 = 30;

// ---------------------------------------------------------------------------
// Grade statistics
// ---------------------------------------------------------------------------

/// Aggregate over a grade set.
///
/// All three aggregates are `None` when the set is empty; `count` is
/// authoritative and callers should branch on it, not on the options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeStatistics {
    pub average: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
    pub count: u32,
}

impl GradeStatistics {
    /// The defined no-data result.
    pub fn empty() -> Self {
        Self {
            average: None,
            highest: None,
            lowest: None,
            count: 0,
        }
    }
}

/// Compute average, highest, and lowest over a grade set.
///
/// The average is rounded to the grade fixed point; highest and lowest
/// are reported as stored.
pub fn grade_statistics(values: &[f64]) -> GradeStatistics {
    if values.is_empty() {
        return GradeStatistics::empty();
    }
    let sum: f64 = values.iter().sum();
    let highest = values.iter().copied().fold(f64::MIN, f64::max);
    let lowest = values.iter().copied().fold(f64::MAX, f64::min);
    GradeStatistics {
        average: Some(round_grade(sum / values.len() as f64)),
        highest: Some(highest),
        lowest: Some(lowest),
        count: values.len() as u32,
    }
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// Attendance aggregate over recorded entries in a window.
///
/// Days with no recorded entry are excluded entirely; `attendance_rate`
/// is a percentage of recorded days and `None` when nothing was recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub attendance_rate: Option<f64>,
    pub total_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
}

impl AttendanceSummary {
    /// The defined no-data result.
    pub fn empty() -> Self {
        Self {
            attendance_rate: None,
            total_days: 0,
            present_days: 0,
            absent_days: 0,
        }
    }
}

/// Summarize recorded attendance flags.
pub fn attendance_summary(present_flags: &[bool]) -> AttendanceSummary {
    if present_flags.is_empty() {
        return AttendanceSummary::empty();
    }
    let total = present_flags.len() as u32;
    let present = present_flags.iter().filter(|&&p| p).count() as u32;
    let rate = f64::from(present) / f64::from(total) * 100.0;
    AttendanceSummary {
        attendance_rate: Some(round_grade(rate)),
        total_days: total,
        present_days: present,
        absent_days: total - present,
    }
}

// ---------------------------------------------------------------------------
// Trend / forecast
// ---------------------------------------------------------------------------

/// Coarse direction of a grade sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    /// Derive the trend label from a fitted slope.
    pub fn from_slope(slope: f64) -> Self {
        if slope > IMPROVING_SLOPE {
            Self::Improving
        } else if slope < DECLINING_SLOPE {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

/// Advisory projection of the next grade in a sequence.
///
/// `InsufficientData` is the graceful floor below [`MIN_TREND_SAMPLES`];
/// the engine never extrapolates from fewer points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Forecast {
    InsufficientData {
        samples: u32,
        required: u32,
    },
    Projection {
        predicted: f64,
        confidence: f64,
        trend: Trend,
        samples: u32,
    },
}

/// Fit a least-squares line over a chronologically ordered grade sequence
/// and project the next value.
///
/// The projection is clamped to the default grade bound. Confidence is in
/// `[0, 1]`, derived from the mean squared residual around the fit: a
/// perfectly linear sequence scores 1.0 and anything with residual
/// variance at or beyond 100 scores 0.0.
pub fn forecast_grades(values: &[f64]) -> Forecast {
    let n = values.len();
    if n < MIN_TREND_SAMPLES {
        return Forecast::InsufficientData {
            samples: n as u32,
            required: MIN_TREND_SAMPLES as u32,
        };
    }

    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..n).map(|i| (i as f64) * (i as f64)).sum();

    let slope = (nf * sum_xy - sum_x * sum_y) / (nf * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / nf;

    let predicted = (slope * nf + intercept).clamp(DEFAULT_GRADE_MIN, DEFAULT_GRADE_MAX);

    let residual_variance = values
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let fitted = slope * i as f64 + intercept;
            (y - fitted).powi(2)
        })
        .sum::<f64>()
        / nf;
    let confidence = 1.0 - residual_variance.min(100.0) / 100.0;

    Forecast::Projection {
        predicted: round_grade(predicted),
        confidence: (confidence * 100.0).round() / 100.0,
        trend: Trend::from_slope(slope),
        samples: n as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- Grade statistics ----------------------------------------------

    #[test]
    fn single_grade_is_its_own_aggregate() {
        let stats = grade_statistics(&[85.5]);
        assert_eq!(stats.average, Some(85.5));
        assert_eq!(stats.highest, Some(85.5));
        assert_eq!(stats.lowest, Some(85.5));
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn aggregates_over_several_grades() {
        let stats = grade_statistics(&[70.0, 80.0, 90.0]);
        assert_eq!(stats.average, Some(80.0));
        assert_eq!(stats.highest, Some(90.0));
        assert_eq!(stats.lowest, Some(70.0));
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn average_lands_on_the_grade_fixed_point() {
        let stats = grade_statistics(&[70.0, 80.0]);
        assert_eq!(stats.average, Some(75.0));
        let stats = grade_statistics(&[70.0, 70.0, 71.0]);
        assert_eq!(stats.average, Some(70.33));
    }

    #[test]
    fn empty_set_yields_no_data_not_zero() {
        let stats = grade_statistics(&[]);
        assert_eq!(stats, GradeStatistics::empty());
        assert_eq!(stats.average, None);
        assert_eq!(stats.count, 0);
    }

    // -- Attendance ----------------------------------------------------

    #[test]
    fn rate_counts_only_recorded_days() {
        let mut flags = vec![true; 18];
        flags.extend([false, false]);
        let summary = attendance_summary(&flags);
        assert_eq!(summary.attendance_rate, Some(90.0));
        assert_eq!(summary.total_days, 20);
        assert_eq!(summary.present_days, 18);
        assert_eq!(summary.absent_days, 2);
    }

    #[test]
    fn no_recorded_days_is_no_data() {
        let summary = attendance_summary(&[]);
        assert_eq!(summary, AttendanceSummary::empty());
        assert_eq!(summary.attendance_rate, None);
    }

    #[test]
    fn all_absent_is_zero_rate_not_no_data() {
        let summary = attendance_summary(&[false, false]);
        assert_eq!(summary.attendance_rate, Some(0.0));
        assert_eq!(summary.total_days, 2);
    }

    // -- Forecast ------------------------------------------------------

    #[test]
    fn below_minimum_samples_degrades_gracefully() {
        assert_matches!(
            forecast_grades(&[]),
            Forecast::InsufficientData { samples: 0, required: 3 }
        );
        assert_matches!(
            forecast_grades(&[90.0, 91.0]),
            Forecast::InsufficientData { samples: 2, required: 3 }
        );
    }

    #[test]
    fn rising_sequence_projects_improving() {
        let forecast = forecast_grades(&[70.0, 75.0, 80.0, 85.0]);
        match forecast {
            Forecast::Projection {
                predicted,
                confidence,
                trend,
                samples,
            } => {
                assert_eq!(predicted, 90.0);
                assert_eq!(trend, Trend::Improving);
                assert_eq!(samples, 4);
                // Perfectly linear fit leaves no residual.
                assert_eq!(confidence, 1.0);
            }
            other => panic!("expected projection, got {other:?}"),
        }
    }

    #[test]
    fn falling_sequence_projects_declining() {
        let forecast = forecast_grades(&[90.0, 80.0, 70.0]);
        assert_matches!(
            forecast,
            Forecast::Projection { trend: Trend::Declining, .. }
        );
    }

    #[test]
    fn flat_sequence_is_stable() {
        let forecast = forecast_grades(&[80.0, 80.2, 79.9, 80.1]);
        assert_matches!(forecast, Forecast::Projection { trend: Trend::Stable, .. });
    }

    #[test]
    fn projection_clamps_to_the_grade_bound() {
        let forecast = forecast_grades(&[90.0, 95.0, 100.0]);
        assert_matches!(
            forecast,
            Forecast::Projection { predicted, .. } if predicted == 100.0
        );
        let forecast = forecast_grades(&[15.0, 10.0, 5.0]);
        assert_matches!(
            forecast,
            Forecast::Projection { predicted, .. } if predicted == 0.0
        );
    }

    #[test]
    fn noisy_sequence_lowers_confidence() {
        let forecast = forecast_grades(&[40.0, 95.0, 30.0, 100.0, 20.0]);
        match forecast {
            Forecast::Projection { confidence, .. } => {
                assert!(confidence < 0.5, "confidence was {confidence}");
                assert!((0.0..=1.0).contains(&confidence));
            }
            other => panic!("expected projection, got {other:?}"),
        }
    }

    #[test]
    fn slope_thresholds_pick_the_trend_label() {
        assert_eq!(Trend::from_slope(0.51), Trend::Improving);
        assert_eq!(Trend::from_slope(0.5), Trend::Stable);
        assert_eq!(Trend::from_slope(-0.5), Trend::Stable);
        assert_eq!(Trend::from_slope(-0.51), Trend::Declining);
        assert_eq!(Trend::from_slope(0.0), Trend::Stable);
    }
}
