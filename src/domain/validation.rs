//! Field-level checks shared by every record type.

use crate::error::MonitorError;

/// Lower bound for percentage fields.
pub const PERCENT_MIN: f64 = 0.0;
/// Upper bound for percentage fields.
pub const PERCENT_MAX: f64 = 100.0;

/// Rejects values outside `[0, 100]` and non-finite values.
///
/// # Errors
///
/// Returns [`MonitorError::InvalidField`] naming `field`.
pub fn percentage(field: &'static str, value: f64) -> Result<(), MonitorError> {
    if !value.is_finite() || !(PERCENT_MIN..=PERCENT_MAX).contains(&value) {
        return Err(MonitorError::invalid_field(
            field,
            format!("{value} out of range [{PERCENT_MIN}, {PERCENT_MAX}]"),
        ));
    }
    Ok(())
}

/// Rejects NaN and infinities.
///
/// # Errors
///
/// Returns [`MonitorError::InvalidField`] naming `field`.
pub fn finite(field: &'static str, value: f64) -> Result<(), MonitorError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MonitorError::invalid_field(field, "must be a finite number"))
    }
}

/// Checks a string column against its maximum length. Blank values are
/// rejected unless `allow_blank` is set.
///
/// # Errors
///
/// Returns [`MonitorError::InvalidField`] naming `field`.
pub fn text(
    field: &'static str,
    value: &str,
    max_chars: usize,
    allow_blank: bool,
) -> Result<(), MonitorError> {
    if !allow_blank && value.trim().is_empty() {
        return Err(MonitorError::invalid_field(field, "may not be blank"));
    }
    let len = value.chars().count();
    if len > max_chars {
        return Err(MonitorError::invalid_field(
            field,
            format!("ensure this field has no more than {max_chars} characters (got {len})"),
        ));
    }
    Ok(())
}
