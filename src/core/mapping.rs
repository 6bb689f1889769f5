//! Assignments to venues: partners, users and concrete devices.

use crate::errors::{AppError, AppResult};
use crate::models::device::{Device, MappedDevice};
use crate::models::people::{User, Vendor};
use crate::models::venue::{UserVenueMapping, Venue, VenuePartnerMapping, VenueRef};
use chrono::{DateTime, Local};

/// Result of a bulk device mapping.
#[derive(Debug, Default, PartialEq)]
pub struct MapOutcome {
    pub added: Vec<String>,
    /// Device ids that were already mapped somewhere
    pub skipped: Vec<String>,
}

pub fn find_venue<'a>(venues: &'a [Venue], name: &str) -> AppResult<&'a Venue> {
    venues
        .iter()
        .find(|v| v.venue_name.eq_ignore_ascii_case(name.trim()) || v.venue_id == name.trim())
        .ok_or_else(|| AppError::NotFound(format!("Venue {}", name)))
}

fn resolve_venues(venues: &[Venue], names: &[String]) -> AppResult<Vec<VenueRef>> {
    if names.is_empty() {
        return Err(AppError::invalid("venues", "select at least one venue"));
    }
    names
        .iter()
        .map(|n| find_venue(venues, n).map(VenueRef::from))
        .collect()
}

fn merge_venues(target: &mut Vec<VenueRef>, new: Vec<VenueRef>) {
    for v in new {
        if !target.iter().any(|t| t.venue_id == v.venue_id) {
            target.push(v);
        }
    }
}

/// Add devices to a venue, never twice by `device_id`.
pub fn map_devices(
    mapped: &mut Vec<MappedDevice>,
    venue: &Venue,
    devices: &[&Device],
    mapped_by: &str,
    now: DateTime<Local>,
) -> MapOutcome {
    let mut outcome = MapOutcome::default();

    for d in devices {
        if mapped.iter().any(|m| m.device_id == d.device_id) {
            outcome.skipped.push(d.device_id.to_string());
            continue;
        }
        mapped.push(MappedDevice {
            venue_name: venue.venue_name.clone(),
            device_type: d.device_type,
            device_id: d.device_id.to_string(),
            device_name: d.device_name.to_string(),
            partner_name: d.partner_name.to_string(),
            mapped_at: now,
            mapped_by: mapped_by.to_string(),
        });
        outcome.added.push(d.device_id.to_string());
    }

    outcome
}

/// Remove a mapped device outright.
pub fn unmap_device(mapped: &mut Vec<MappedDevice>, device_id: &str) -> AppResult<MappedDevice> {
    let idx = mapped
        .iter()
        .position(|m| m.device_id.eq_ignore_ascii_case(device_id.trim()))
        .ok_or_else(|| AppError::NotFound(format!("Mapped device {}", device_id)))?;
    Ok(mapped.remove(idx))
}

/// Map a partner to venues, merging with any venues it already covers.
pub fn map_partner(
    mappings: &mut Vec<VenuePartnerMapping>,
    partner: &Vendor,
    venues: &[Venue],
    venue_names: &[String],
) -> AppResult<VenuePartnerMapping> {
    let refs = resolve_venues(venues, venue_names)?;

    if let Some(m) = mappings.iter_mut().find(|m| m.partner_id == partner.id) {
        merge_venues(&mut m.venues, refs);
        return Ok(m.clone());
    }

    let m = VenuePartnerMapping {
        partner_id: partner.id.clone(),
        partner_name: partner.name.clone(),
        partner_type: partner.partner_type.clone(),
        venues: refs,
        contact_person: partner.contact_person.clone(),
        phone: partner.phone.clone(),
        status: partner.status.clone(),
    };
    mappings.push(m.clone());
    Ok(m)
}

/// Map a user to venues, merging with any venues already assigned.
pub fn map_user(
    mappings: &mut Vec<UserVenueMapping>,
    user: &User,
    venues: &[Venue],
    venue_names: &[String],
) -> AppResult<UserVenueMapping> {
    let refs = resolve_venues(venues, venue_names)?;

    if let Some(m) = mappings.iter_mut().find(|m| m.user_id == user.id) {
        merge_venues(&mut m.venues, refs);
        return Ok(m.clone());
    }

    let m = UserVenueMapping {
        partner_id: user.partner_id.clone(),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        user_role: user.role.clone(),
        venues: refs,
    };
    mappings.push(m.clone());
    Ok(m)
}
