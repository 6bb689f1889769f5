//! Flat tables for listing and export.

use crate::export::ReportTable;
use crate::models::attendance::AttendanceRecord;
use crate::models::device::{DeviceActivity, DeviceRequirementRow};
use crate::models::venue::{UserVenueMapping, VenuePartnerMapping};
use crate::utils::formatting::{opt_or_dash, yes_no};
use crate::utils::time::format_instant;

/// One row per (partner or user, venue).
pub fn mapping_table(partners: &[VenuePartnerMapping], users: &[UserVenueMapping]) -> ReportTable {
    let mut t = ReportTable::new(
        "Mapping",
        &["kind", "id", "name", "type_or_role", "partner_id", "venue_id", "venue_name", "city"],
    );

    for p in partners {
        for v in &p.venues {
            t.push(vec![
                "partner".into(),
                p.partner_id.clone(),
                p.partner_name.clone(),
                p.partner_type.clone(),
                p.partner_id.clone(),
                v.venue_id.clone(),
                v.venue_name.clone(),
                v.city.clone(),
            ]);
        }
    }

    for u in users {
        for v in &u.venues {
            t.push(vec![
                "user".into(),
                u.user_id.clone(),
                u.user_name.clone(),
                u.user_role.clone(),
                u.partner_id.clone(),
                v.venue_id.clone(),
                v.venue_name.clone(),
                v.city.clone(),
            ]);
        }
    }

    t
}

pub fn attendance_table(records: &[AttendanceRecord]) -> ReportTable {
    let mut t = ReportTable::new(
        "Attendance",
        &[
            "id",
            "user_id",
            "session_id",
            "venue_name",
            "labs",
            "device_type",
            "device_id",
            "present",
            "distance_m",
            "allotted_by",
            "allotted_on",
            "deallocated_by",
            "deallocated_on",
            "previous_device",
        ],
    );

    for r in records {
        t.push(vec![
            r.id.clone(),
            r.user_id.clone(),
            r.session_id.clone(),
            r.venue_name.clone(),
            r.labs.join("; "),
            opt_or_dash(r.device_type.map(|d| d.name())),
            opt_or_dash(r.device_id.as_deref()),
            yes_no(r.present).to_string(),
            format!("{:.0}", r.checkin_distance),
            r.allotted_by.clone(),
            format_instant(&r.allotted_on),
            opt_or_dash(r.deallocated_by.as_deref()),
            r.deallocated_on
                .map(|d| format_instant(&d))
                .unwrap_or_else(|| "-".into()),
            opt_or_dash(r.deallocation_prev.as_ref().map(|p| p.device_id.as_str())),
        ]);
    }

    t
}

pub fn requirements_table(rows: &[DeviceRequirementRow]) -> ReportTable {
    let mut t = ReportTable::new(
        "Requirements",
        &[
            "venue_name",
            "device_type",
            "candidates",
            "required",
            "buffer",
            "total",
            "sent",
            "received",
            "variance",
            "difference",
        ],
    );

    for r in rows {
        let v = r.variance();
        t.push(vec![
            r.venue_name.clone(),
            r.device_type.name().to_string(),
            r.candidates.to_string(),
            r.required.to_string(),
            r.buffer.to_string(),
            r.total().to_string(),
            r.sent.to_string(),
            r.received.to_string(),
            v.label().to_string(),
            v.signed(),
        ]);
    }

    t
}

pub fn activities_table(activities: &[DeviceActivity]) -> ReportTable {
    let mut t = ReportTable::new(
        "Activities",
        &["id", "timestamp", "venue_name", "device_type", "action", "quantity", "remarks", "logged_by"],
    );

    for a in activities {
        t.push(vec![
            a.id.clone(),
            format_instant(&a.timestamp),
            a.venue_name.clone(),
            a.device_type.name().to_string(),
            a.action.as_str().to_string(),
            a.quantity.to_string(),
            a.remarks.clone(),
            a.logged_by.clone(),
        ]);
    }

    t
}
