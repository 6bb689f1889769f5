//! Attendance marking and device issuance per (user, session).
//!
//! A user moves from unmarked to present for a session only when every
//! guard passes, checked in this order:
//!
//! 1. the session exists and the user is not already present in it
//! 2. at least one lab; several only for the Server Manager role
//! 3. a device of the chosen type, mapped to the venue, not held by
//!    another user's active record
//! 4. a captured face photo
//! 5. the live position is inside the venue geofence
//!
//! A failed guard returns its error and leaves the records untouched.

use crate::config::Config;
use crate::core::geo::check_geofence;
use crate::core::mapping::find_venue;
use crate::core::sessions::find_session;
use crate::db::store::next_id;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, DeviceRef};
use crate::models::device::{DeviceType, MappedDevice};
use crate::models::people::SERVER_MANAGER;
use crate::models::session::SessionInstance;
use crate::models::venue::Venue;
use crate::utils::path::require_photo;
use chrono::{DateTime, Local};

/// Everything the user submits from the attendance form.
#[derive(Debug, Clone)]
pub struct MarkRequest {
    pub user_id: String,
    pub user_role: String,
    pub session_id: String,
    pub venue_name: String,
    pub labs: Vec<String>,
    pub device_type: Option<DeviceType>,
    pub device_id: Option<String>,
    pub face_image: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Read-only state the guards are evaluated against.
pub struct MarkContext<'a> {
    pub sessions: &'a [SessionInstance],
    pub venues: &'a [Venue],
    pub mapped: &'a [MappedDevice],
    pub cfg: &'a Config,
}

/// One selectable device in the allocation list.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceOption<'a> {
    pub device: &'a MappedDevice,
    /// User currently holding the device, if it is someone else
    pub held_by: Option<String>,
}

impl DeviceOption<'_> {
    pub fn disabled(&self) -> bool {
        self.held_by.is_some()
    }
}

pub fn is_marked(records: &[AttendanceRecord], user_id: &str, session_id: &str) -> bool {
    records
        .iter()
        .any(|r| {
            r.present
                && r.user_id.eq_ignore_ascii_case(user_id.trim())
                && r.session_id.eq_ignore_ascii_case(session_id.trim())
        })
}

/// Holder of `device_id` among active records, excluding `user_id`.
pub fn holder_of(records: &[AttendanceRecord], device_id: &str, user_id: &str) -> Option<String> {
    records
        .iter()
        .find(|r| r.holds_device(device_id) && !r.user_id.eq_ignore_ascii_case(user_id.trim()))
        .map(|r| r.user_id.clone())
}

/// Devices of `device_type` mapped to the venue; those held by another
/// user's active record come back disabled.
pub fn available_devices<'a>(
    mapped: &'a [MappedDevice],
    records: &[AttendanceRecord],
    venue_name: &str,
    device_type: DeviceType,
    user_id: &str,
) -> Vec<DeviceOption<'a>> {
    mapped
        .iter()
        .filter(|m| m.venue_name.eq_ignore_ascii_case(venue_name) && m.device_type == device_type)
        .map(|m| DeviceOption {
            device: m,
            held_by: holder_of(records, &m.device_id, user_id),
        })
        .collect()
}

fn check_labs(venue: &Venue, labs: &[String], role: &str) -> AppResult<()> {
    if labs.is_empty() {
        return Err(AppError::invalid("labs", "select at least one lab"));
    }
    if labs.len() > 1 && !role.eq_ignore_ascii_case(SERVER_MANAGER) {
        return Err(AppError::invalid(
            "labs",
            format!("only a {} can be assigned to more than one lab", SERVER_MANAGER),
        ));
    }
    if !venue.labs.is_empty()
        && let Some(unknown) = labs
            .iter()
            .find(|l| !venue.labs.iter().any(|v| v.eq_ignore_ascii_case(l)))
    {
        return Err(AppError::NotFound(format!(
            "Lab {} at {}",
            unknown, venue.venue_name
        )));
    }
    Ok(())
}

fn pick_device<'a>(
    ctx: &MarkContext<'a>,
    records: &[AttendanceRecord],
    req: &MarkRequest,
) -> AppResult<&'a MappedDevice> {
    let device_type = req
        .device_type
        .ok_or_else(|| AppError::invalid("device type", "select a device type"))?;
    let device_id = req
        .device_id
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::invalid("device", "select a device"))?;

    let device = ctx
        .mapped
        .iter()
        .find(|m| {
            m.device_id.eq_ignore_ascii_case(device_id.trim())
                && m.venue_name.eq_ignore_ascii_case(&req.venue_name)
        })
        .ok_or_else(|| AppError::NotFound(format!("Device {} at {}", device_id, req.venue_name)))?;

    if device.device_type != device_type {
        return Err(AppError::invalid(
            "device",
            format!("{} is a {}, not a {}", device.device_id, device.device_type, device_type),
        ));
    }

    if holder_of(records, &device.device_id, &req.user_id).is_some() {
        return Err(AppError::DeviceUnavailable(device.device_id.clone()));
    }

    Ok(device)
}

/// Run every guard and append the new present record.
pub fn mark_attendance(
    records: &mut Vec<AttendanceRecord>,
    ctx: &MarkContext<'_>,
    req: &MarkRequest,
    allotted_by: &str,
    now: DateTime<Local>,
) -> AppResult<AttendanceRecord> {
    // (a)
    let session = find_session(ctx.sessions, &req.session_id)?;
    if is_marked(records, &req.user_id, &session.id) {
        return Err(AppError::AlreadyMarked {
            user_id: req.user_id.clone(),
            session_id: session.id.clone(),
        });
    }
    let venue = find_venue(ctx.venues, &req.venue_name)?;

    // (b)
    check_labs(venue, &req.labs, &req.user_role)?;

    // (c)
    let device = pick_device(ctx, records, req)?;

    // (d)
    let face_image = require_photo(req.face_image.as_deref())?;

    // (e)
    let distance = check_geofence(venue, req.lat, req.lng, ctx.cfg)?;

    let record = AttendanceRecord {
        id: next_id("ATT", records.iter().map(|r| r.id.as_str())),
        user_id: req.user_id.clone(),
        session_id: session.id.clone(),
        venue_name: venue.venue_name.clone(),
        labs: req.labs.clone(),
        device_id: Some(device.device_id.clone()),
        device_name: Some(device.device_name.clone()),
        device_type: Some(device.device_type),
        face_image,
        allotted_by: allotted_by.to_string(),
        allotted_on: now,
        present: true,
        checkin_lat: req.lat,
        checkin_lng: req.lng,
        checkin_distance: distance,
        deallocated_by: None,
        deallocated_on: None,
        deallocation_prev: None,
    };

    records.push(record.clone());
    Ok(record)
}

/// Release the devices of the selected users in one session.
/// Returns how many records were changed.
pub fn deallocate(
    records: &mut [AttendanceRecord],
    session_id: &str,
    user_ids: &[String],
    by: &str,
    now: DateTime<Local>,
) -> usize {
    let mut changed = 0;

    for r in records.iter_mut() {
        if !r.session_id.eq_ignore_ascii_case(session_id)
            || !user_ids.iter().any(|u| u.trim().eq_ignore_ascii_case(&r.user_id))
            || !r.is_active()
        {
            continue;
        }

        if let (Some(device_id), Some(device_type)) = (r.device_id.take(), r.device_type.take()) {
            r.deallocation_prev = Some(DeviceRef {
                device_id,
                device_name: r.device_name.take().unwrap_or_default(),
                device_type,
            });
        }
        r.device_name = None;
        r.deallocated_by = Some(by.to_string());
        r.deallocated_on = Some(now);
        changed += 1;
    }

    changed
}
