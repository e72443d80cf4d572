//! Grade arithmetic: bounds, fixed-point normalization, letter mapping.
//!
//! Grades are fixed-point with two decimal places, half-up rounding.
//! Normalization rounds before the bound check so a caller sending
//! `89.999` stores `90.0` while anything that still lands outside the
//! configured range is rejected without touching storage.

use crate::error::CoreError;

/// Default grade bounds. Deployments can override via grading settings.
pub const DEFAULT_GRADE_MIN: f64 = 0.0;
pub const DEFAULT_GRADE_MAX: f64 = 100.0;

/// Default pass mark.
pub const DEFAULT_PASSING_GRADE: f64 = 60.0;

/// Round to two decimal places, half-up.
pub fn round_grade(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalize a grade value against the configured bound.
///
/// Rejects non-finite input and anything outside `[min, max]` after
/// rounding. Returns the rounded value to store.
pub fn normalize_grade(value: f64, min: f64, max: f64) -> Result<f64, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(
            "grade must be a finite number".to_string(),
        ));
    }
    let rounded = round_grade(value);
    if rounded < min || rounded > max {
        return Err(CoreError::Validation(format!(
            "grade must be between {min} and {max}, got {rounded}"
        )));
    }
    Ok(rounded)
}

/// Letter grade for a percentage, standard plus/minus bands.
pub fn letter_grade(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 97.0 => "A+",
        p if p >= 93.0 => "A",
        p if p >= 90.0 => "A-",
        p if p >= 87.0 => "B+",
        p if p >= 83.0 => "B",
        p if p >= 80.0 => "B-",
        p if p >= 77.0 => "C+",
        p if p >= 73.0 => "C",
        p if p >= 70.0 => "C-",
        p if p >= 67.0 => "D+",
        p if p >= 63.0 => "D",
        p if p >= 60.0 => "D-",
        _ => "F",
    }
}

/// Whether a grade meets the pass mark.
pub fn is_passing(value: f64, passing_grade: f64) -> bool {
    value >= passing_grade
}
