use crate::errors::{AppError, AppResult};
use regex::Regex;

const MOBILE_RE: &str = r"^\d{10}$";
const AADHAR_RE: &str = r"^\d{12}$";
const EMAIL_RE: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

fn matches(pattern: &str, value: &str) -> AppResult<bool> {
    let re = Regex::new(pattern).map_err(|e| AppError::Other(e.to_string()))?;
    Ok(re.is_match(value))
}

pub fn require(field: &str, value: &str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::invalid(field, "is required"));
    }
    Ok(v.to_string())
}

pub fn mobile(value: &str) -> AppResult<String> {
    let v = value.trim();
    if !matches(MOBILE_RE, v)? {
        return Err(AppError::invalid("mobile", "must be exactly 10 digits"));
    }
    Ok(v.to_string())
}

pub fn aadhar(value: &str) -> AppResult<String> {
    let v = value.trim();
    if !matches(AADHAR_RE, v)? {
        return Err(AppError::invalid("aadhar", "must be exactly 12 digits"));
    }
    Ok(v.to_string())
}

/// Empty is allowed; anything else must look like an address.
pub fn optional_email(value: &str) -> AppResult<String> {
    let v = value.trim();
    if !v.is_empty() && !matches(EMAIL_RE, v)? {
        return Err(AppError::invalid("email", format!("'{}' is not a valid address", v)));
    }
    Ok(v.to_string())
}
