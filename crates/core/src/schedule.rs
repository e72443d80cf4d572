//! Schedule slot domain rules: weekdays and teaching periods.
//!
//! Slots exist only on school weekdays, periods run 1 through 8. The same
//! period bound applies to attendance entries, which reference the period
//! a class met in.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// First teaching period of the day.
pub const MIN_PERIOD: i32 = 1;

/// Last teaching period of the day.
pub const MAX_PERIOD: i32 = 8;

/// School weekdays. Weekend slots are not schedulable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// The storage and wire form of the weekday.
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
        }
    }

    /// Parse the storage form back into a weekday.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            other => Err(CoreError::Validation(format!("unknown weekday: {other}"))),
        }
    }
}

/// Validate that a period falls within the teaching day.
pub fn validate_period(period: i32) -> Result<(), CoreError> {
    if !(MIN_PERIOD..=MAX_PERIOD).contains(&period) {
        return Err(CoreError::Validation(format!(
            "period must be between {MIN_PERIOD} and {MAX_PERIOD}, got {period}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parse_round_trips() {
        for day in [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ] {
            assert_eq!(Weekday::parse(day.as_str()).unwrap(), day);
        }
    }

    #[test]
    fn weekends_are_not_weekdays() {
        assert!(Weekday::parse("saturday").is_err());
        assert!(Weekday::parse("sunday").is_err());
        assert!(Weekday::parse("Monday").is_err());
    }

    #[test]
    fn period_bounds_are_inclusive() {
        assert!(validate_period(MIN_PERIOD).is_ok());
        assert!(validate_period(MAX_PERIOD).is_ok());
        assert!(validate_period(4).is_ok());
    }

    #[test]
    fn out_of_day_periods_rejected() {
        assert!(validate_period(0).is_err());
        assert!(validate_period(9).is_err());
        assert!(validate_period(-1).is_err());
    }
}
