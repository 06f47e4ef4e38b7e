//! Reusable field validators
//!
//! Each validator inspects one candidate value and returns a message when
//! the value breaks the rule.

/// Field is present and not blank
pub fn required_text(value: Option<&str>) -> Result<(), String> {
    match value {
        None => Err("is required".to_string()),
        Some(s) if s.trim().is_empty() => Err("must not be blank".to_string()),
        Some(_) => Ok(()),
    }
}

/// Number is present, finite and not negative
pub fn required_non_negative(value: Option<f64>) -> Result<f64, String> {
    let value = value.ok_or_else(|| "is required".to_string())?;
    non_negative(value)?;
    Ok(value)
}

/// Number is finite and not negative
pub fn non_negative(value: f64) -> Result<(), String> {
    if !value.is_finite() {
        Err("must be a finite number".to_string())
    } else if value < 0.0 {
        Err(format!("must be greater than or equal to 0 (got {})", value))
    } else {
        Ok(())
    }
}

/// Number is present and a whole number of at least one
pub fn positive_count(value: Option<f64>) -> Result<u32, String> {
    let value = value.ok_or_else(|| "is required".to_string())?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("must be a whole number (got {})", value));
    }
    if value < 1.0 {
        return Err(format!("must be at least 1 (got {})", value));
    }
    if value > f64::from(u32::MAX) {
        return Err(format!("must be at most {} (got {})", u32::MAX, value));
    }
    Ok(value as u32)
}
