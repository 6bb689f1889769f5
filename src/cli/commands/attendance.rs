use crate::cli::AppContext;
use crate::cli::commands::print_report;
use crate::cli::parser::AttendanceCmd;
use crate::core::attendance::{MarkContext, MarkRequest, deallocate, mark_attendance};
use crate::core::emergency;
use crate::core::reports::attendance_table;
use crate::core::sessions::find_session;
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::keys;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::device::MappedDevice;
use crate::models::people::{EmergencyUser, User};
use crate::models::venue::Venue;
use crate::ui::messages::{info, success};
use crate::utils::formatting::meters;

/// Stored id and role of a registered user, or of an emergency
/// registration still active.
fn resolve_user(ws: &Workspace<'_>, ctx: &AppContext, user_id: &str) -> AppResult<(String, String)> {
    let users: Vec<User> = ws.load_master(keys::USERS)?;
    if let Some(u) = users.iter().find(|u| u.id.eq_ignore_ascii_case(user_id.trim())) {
        return Ok((u.id.clone(), u.role.clone()));
    }

    let emergency: Vec<EmergencyUser> = ws.load(keys::EMERGENCY_USERS)?;
    emergency::active(&emergency, ctx.now, ctx.cfg.emergency_validity_hours)
        .into_iter()
        .find(|u| u.id.eq_ignore_ascii_case(user_id.trim()))
        .map(|u| (u.id.clone(), u.role.clone()))
        .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))
}

pub fn handle(cmd: &AttendanceCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let mut records: Vec<AttendanceRecord> = ws.load(keys::ATTENDANCE)?;

    match cmd {
        AttendanceCmd::Mark {
            user,
            session,
            venue,
            labs,
            device_type,
            device,
            photo,
            lat,
            lng,
        } => {
            let sessions = ws.sessions()?;
            let venues: Vec<Venue> = ws.load(keys::VENUES)?;
            let mapped: Vec<MappedDevice> = ws.load(keys::MAPPED_DEVICES)?;

            let (user_id, user_role) = resolve_user(&ws, ctx, user)?;
            let req = MarkRequest {
                user_id,
                user_role,
                session_id: session.clone(),
                venue_name: venue.clone(),
                labs: labs.clone(),
                device_type: *device_type,
                device_id: device.clone(),
                face_image: photo.clone(),
                lat: *lat,
                lng: *lng,
            };
            let mark_ctx = MarkContext {
                sessions: &sessions,
                venues: &venues,
                mapped: &mapped,
                cfg: &ctx.cfg,
            };

            let r = mark_attendance(&mut records, &mark_ctx, &req, ctx.operator(), ctx.now)?;
            ws.save(keys::ATTENDANCE, &records)?;

            let device_id = r.device_id.clone().unwrap_or_default();
            ttlog(
                &pool.conn,
                "attendance_mark",
                &r.id,
                &format!(
                    "{} present in {} at {} with {}",
                    r.user_id, r.session_id, r.venue_name, device_id
                ),
            )?;
            success(format!(
                "Attendance marked for {} in {} ({} from venue). Device {} issued.",
                r.user_id,
                r.session_id,
                meters(r.checkin_distance),
                device_id
            ));
        }

        AttendanceCmd::Deallocate { session, users } => {
            let sessions = ws.sessions()?;
            let s = find_session(&sessions, session)?;

            let changed = deallocate(&mut records, &s.id, users, ctx.operator(), ctx.now);
            if changed == 0 {
                info(format!("No active device allocations for those users in {}.", s.id));
                return Ok(());
            }

            ws.save(keys::ATTENDANCE, &records)?;
            ttlog(
                &pool.conn,
                "attendance_deallocate",
                &s.id,
                &format!("Released {} device(s): {}", changed, users.join(", ")),
            )?;
            success(format!("{} device(s) released in {}.", changed, s.id));
        }

        AttendanceCmd::List { session } => {
            let shown: Vec<AttendanceRecord> = records
                .into_iter()
                .filter(|r| {
                    session
                        .as_deref()
                        .is_none_or(|s| r.session_id.eq_ignore_ascii_case(s.trim()))
                })
                .collect();
            print_report(&attendance_table(&shown), "No attendance records.");
        }
    }

    Ok(())
}
