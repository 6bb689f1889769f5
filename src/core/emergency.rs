//! Emergency onboarding: a short-lived registration with a face photo.
//! Expiry is a read-time filter; expired records are kept in storage.

use crate::core::validation;
use crate::db::store::next_id;
use crate::errors::{AppError, AppResult};
use crate::models::people::{EmergencyUser, User};
use crate::utils::path::require_photo;
use chrono::{DateTime, Duration, Local};

#[derive(Debug, Clone, Default)]
pub struct EmergencyRequest {
    pub name: String,
    pub mobile: String,
    pub aadhar: String,
    pub role: String,
    pub partner_id: String,
    pub face_image: Option<String>,
}

/// End of the validity window, `None` if it falls outside the representable range.
pub fn expires_at(user: &EmergencyUser, validity_hours: i64) -> Option<DateTime<Local>> {
    Duration::try_hours(validity_hours).and_then(|d| user.created_at.checked_add_signed(d))
}

pub fn is_active(user: &EmergencyUser, now: DateTime<Local>, validity_hours: i64) -> bool {
    expires_at(user, validity_hours).is_none_or(|end| now < end)
}

pub fn active(
    users: &[EmergencyUser],
    now: DateTime<Local>,
    validity_hours: i64,
) -> Vec<&EmergencyUser> {
    users
        .iter()
        .filter(|u| is_active(u, now, validity_hours))
        .collect()
}

/// Time left before the record drops out of active lists.
pub fn remaining(user: &EmergencyUser, now: DateTime<Local>, validity_hours: i64) -> Duration {
    expires_at(user, validity_hours)
        .map(|end| (end - now).max(Duration::zero()))
        .unwrap_or(Duration::MAX)
}

pub fn onboard(
    emergency: &mut Vec<EmergencyUser>,
    registered: &[User],
    req: &EmergencyRequest,
    now: DateTime<Local>,
    validity_hours: i64,
) -> AppResult<EmergencyUser> {
    let name = validation::require("name", &req.name)?;
    let mobile = validation::mobile(&req.mobile)?;
    let aadhar = validation::aadhar(&req.aadhar)?;
    let role = validation::require("role", &req.role)?;
    let partner_id = validation::require("partner", &req.partner_id)?;
    let face_image = require_photo(req.face_image.as_deref())?;

    let taken = registered.iter().any(|u| u.mobile == mobile)
        || active(emergency, now, validity_hours)
            .iter()
            .any(|u| u.mobile == mobile);
    if taken {
        return Err(AppError::Duplicate(format!("mobile number {}", mobile)));
    }

    let user = EmergencyUser {
        id: next_id("EMG", emergency.iter().map(|u| u.id.as_str())),
        name,
        mobile,
        aadhar,
        role,
        partner_id,
        face_image,
        created_at: now,
    };

    emergency.push(user.clone());
    Ok(user)
}
