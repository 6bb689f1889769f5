//! Device requirement calculation per (venue, device type).

use crate::core::mapping::find_venue;
use crate::db::store::next_id;
use crate::errors::{AppError, AppResult};
use crate::models::device::{
    DeviceAction, DeviceActivity, DeviceRequirementRow, DeviceType, RequirementLedger,
};
use crate::models::venue::Venue;
use chrono::{DateTime, Local};

fn div_ceil(a: u64, b: u64) -> u64 {
    if b == 0 { 0 } else { a.div_ceil(b) }
}

/// `ceil(count × candidates / divisor) + extra`
pub fn required_for(device_type: DeviceType, candidates: u32) -> u32 {
    let r = device_type.ratio();
    let base = div_ceil(r.count as u64 * candidates as u64, r.divisor as u64);
    base as u32 + r.extra
}

/// `ceil(required × percent / 100)`
pub fn default_buffer(required: u32, percent: u32) -> u32 {
    div_ceil(required as u64 * percent as u64, 100) as u32
}

/// One row per venue and device type, in venue order then `DeviceType::ALL` order.
pub fn requirement_rows(
    venues: &[Venue],
    ledger: &[RequirementLedger],
    buffer_percent: u32,
) -> Vec<DeviceRequirementRow> {
    let mut rows = Vec::with_capacity(venues.len() * DeviceType::ALL.len());

    for venue in venues {
        for device_type in DeviceType::ALL {
            let entry = ledger
                .iter()
                .find(|l| l.venue_name == venue.venue_name && l.device_type == device_type);

            let required = required_for(device_type, venue.candidates);
            let buffer = entry
                .and_then(|l| l.buffer_override)
                .unwrap_or_else(|| default_buffer(required, buffer_percent));

            rows.push(DeviceRequirementRow {
                venue_name: venue.venue_name.clone(),
                device_type,
                candidates: venue.candidates,
                required,
                buffer,
                sent: entry.map(|l| l.sent).unwrap_or(0),
                received: entry.map(|l| l.received).unwrap_or(0),
            });
        }
    }

    rows
}

/// Ledger entry for (venue, type), created on first use.
pub fn ledger_entry<'a>(
    ledger: &'a mut Vec<RequirementLedger>,
    venue_name: &str,
    device_type: DeviceType,
) -> &'a mut RequirementLedger {
    let idx = match ledger
        .iter()
        .position(|l| l.venue_name == venue_name && l.device_type == device_type)
    {
        Some(i) => i,
        None => {
            ledger.push(RequirementLedger::new(venue_name, device_type));
            ledger.len() - 1
        }
    };
    &mut ledger[idx]
}

/// Explicit edit mode: pin the buffer, or `None` to go back to the default.
pub fn set_buffer_override(
    ledger: &mut Vec<RequirementLedger>,
    venues: &[Venue],
    venue_name: &str,
    device_type: DeviceType,
    buffer: Option<u32>,
) -> AppResult<()> {
    let venue = find_venue(venues, venue_name)?;
    ledger_entry(ledger, &venue.venue_name, device_type).buffer_override = buffer;
    Ok(())
}

/// Count a logistics entry against its requirement row. A counter that
/// would overflow is rejected and the ledger is left as it was.
pub fn apply_activity(
    ledger: &mut Vec<RequirementLedger>,
    activity: &DeviceActivity,
) -> AppResult<()> {
    let entry = ledger_entry(ledger, &activity.venue_name, activity.device_type);
    let counter = match activity.action {
        DeviceAction::Send => &mut entry.sent,
        DeviceAction::Receive => &mut entry.received,
    };

    *counter = counter.checked_add(activity.quantity).ok_or_else(|| {
        AppError::invalid(
            "quantity",
            format!(
                "{} more {} would exceed the {} counter limit",
                activity.quantity,
                activity.device_type,
                activity.action.as_str()
            ),
        )
    })?;
    Ok(())
}

/// Append an immutable send/receive entry and count it on the ledger.
#[allow(clippy::too_many_arguments)]
pub fn log_activity(
    activities: &mut Vec<DeviceActivity>,
    ledger: &mut Vec<RequirementLedger>,
    venues: &[Venue],
    venue_name: &str,
    device_type: DeviceType,
    action: DeviceAction,
    quantity: u32,
    remarks: &str,
    logged_by: &str,
    now: DateTime<Local>,
) -> AppResult<DeviceActivity> {
    let venue = find_venue(venues, venue_name)?;
    if quantity == 0 {
        return Err(AppError::invalid("quantity", "must be greater than zero"));
    }

    let activity = DeviceActivity {
        id: next_id("ACT", activities.iter().map(|a| a.id.as_str())),
        venue_name: venue.venue_name.clone(),
        device_type,
        action,
        quantity,
        remarks: remarks.trim().to_string(),
        timestamp: now,
        logged_by: logged_by.to_string(),
    };

    apply_activity(ledger, &activity)?;
    activities.push(activity.clone());
    Ok(activity)
}

/// Drop the pinned buffer; the row goes back to `buffer_percent`.
pub fn clear_buffer_override(
    ledger: &mut Vec<RequirementLedger>,
    venues: &[Venue],
    venue_name: &str,
    device_type: DeviceType,
) -> AppResult<()> {
    set_buffer_override(ledger, venues, venue_name, device_type, None)
}
