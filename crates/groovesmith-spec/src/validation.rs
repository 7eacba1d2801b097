//! Input validation shared by the composers and the render engine.
//!
//! All checks run before any buffer is allocated.

use crate::error::{SpecError, SpecResult};

/// Validate that a tempo is a positive BPM value.
///
/// # Example
/// ```
/// use groovesmith_spec::validation::validate_tempo;
///
/// assert!(validate_tempo(120).is_ok());
/// assert!(validate_tempo(0).is_err());
/// ```
pub fn validate_tempo(tempo: u32) -> SpecResult<u32> {
    if tempo == 0 {
        return Err(SpecError::invalid_input("tempo", "must be greater than 0 BPM"));
    }
    Ok(tempo)
}

/// Validate that a bar count is at least one.
pub fn validate_bars(bars: u32) -> SpecResult<u32> {
    if bars == 0 {
        return Err(SpecError::invalid_input("bars", "must be at least 1"));
    }
    Ok(bars)
}

/// Validate that a duration in seconds is finite and non-negative.
pub fn validate_duration(field: &str, seconds: f64) -> SpecResult<f64> {
    if !seconds.is_finite() {
        return Err(SpecError::invalid_input(
            field,
            format!("must be finite, got {}", seconds),
        ));
    }
    if seconds < 0.0 {
        return Err(SpecError::invalid_input(
            field,
            format!("must be non-negative, got {}", seconds),
        ));
    }
    Ok(seconds)
}

/// Validate that a value is finite and clamp it into [0, 1].
pub fn clamp_unit(field: &str, value: f64) -> SpecResult<f64> {
    if !value.is_finite() {
        return Err(SpecError::invalid_input(
            field,
            format!("must be finite, got {}", value),
        ));
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Validate that a value is finite and strictly positive.
pub fn validate_positive(field: &str, value: f64) -> SpecResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SpecError::invalid_input(
            field,
            format!("must be a positive finite number, got {}", value),
        ));
    }
    Ok(value)
}

/// Validate an audio sample rate.
pub fn validate_sample_rate(rate: u32) -> SpecResult<u32> {
    if rate == 0 {
        return Err(SpecError::invalid_input("sample_rate", "must be greater than 0"));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bars() {
        assert_eq!(validate_bars(4).unwrap(), 4);
        assert!(validate_bars(0).is_err());
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration("total_duration", 0.0).is_ok());
        assert!(validate_duration("total_duration", 32.0).is_ok());
        assert!(validate_duration("total_duration", -1.0).is_err());
        assert!(validate_duration("total_duration", f64::NAN).is_err());
        assert!(validate_duration("total_duration", f64::INFINITY).is_err());
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit("complexity", 1.7).unwrap(), 1.0);
        assert_eq!(clamp_unit("complexity", -0.2).unwrap(), 0.0);
        assert_eq!(clamp_unit("complexity", 0.4).unwrap(), 0.4);
        assert!(clamp_unit("complexity", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("tempo", 90.5).is_ok());
        assert!(validate_positive("tempo", 0.0).is_err());
        assert!(validate_positive("tempo", f64::NEG_INFINITY).is_err());
    }
}
