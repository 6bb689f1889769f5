use crate::cli::AppContext;
use crate::cli::commands::print_report;
use crate::cli::parser::DeviceCmd;
use crate::core::attendance::available_devices;
use crate::core::catalog::{filter_catalog, find_device};
use crate::core::mapping::{self, find_venue};
use crate::core::reports::activities_table;
use crate::core::requirements;
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::keys;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::device::{DeviceActivity, MappedDevice, RequirementLedger};
use crate::models::venue::Venue;
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::confirm;
use crate::utils::colors::{color_for_variance, paint};
use crate::utils::table::Table;
use crate::utils::time::format_instant;

pub fn handle(cmd: &DeviceCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);

    match cmd {
        DeviceCmd::Catalog {
            device_type,
            partner,
            search,
        } => {
            let devices = filter_catalog(*device_type, partner.as_deref(), search.as_deref());
            if devices.is_empty() {
                info("No catalog devices match the filters.");
                return Ok(());
            }
            let mut t = Table::new(&["ID", "NAME", "TYPE", "PARTNER"]);
            for d in devices {
                t.add_row(vec![
                    d.device_id.to_string(),
                    d.device_name.to_string(),
                    d.device_type.to_string(),
                    d.partner_name.to_string(),
                ]);
            }
            print!("{}", t.render());
        }

        DeviceCmd::Requirements { venue } => {
            let venues: Vec<Venue> = ws.load(keys::VENUES)?;
            let ledger: Vec<RequirementLedger> = ws.load(keys::DEVICE_LEDGER)?;

            let selected: Vec<Venue> = match venue {
                Some(name) => vec![find_venue(&venues, name)?.clone()],
                None => venues,
            };

            let rows = requirements::requirement_rows(&selected, &ledger, ctx.cfg.buffer_percent);
            if rows.is_empty() {
                info(format!("No venues in subproject {}.", ctx.project));
                return Ok(());
            }

            let mut t = Table::new(&[
                "VENUE", "DEVICE", "CANDIDATES", "REQUIRED", "BUFFER", "TOTAL", "SENT", "RECEIVED",
                "VARIANCE",
            ]);
            for r in &rows {
                let v = r.variance();
                t.add_row(vec![
                    r.venue_name.clone(),
                    r.device_type.to_string(),
                    r.candidates.to_string(),
                    r.required.to_string(),
                    r.buffer.to_string(),
                    r.total().to_string(),
                    r.sent.to_string(),
                    r.received.to_string(),
                    paint(color_for_variance(&v), &format!("{} ({})", v.label(), v.signed())),
                ]);
            }
            print!("{}", t.render());
        }

        DeviceCmd::Buffer {
            venue,
            device_type,
            value,
            reset,
        } => {
            let venues: Vec<Venue> = ws.load(keys::VENUES)?;
            let mut ledger: Vec<RequirementLedger> = ws.load(keys::DEVICE_LEDGER)?;

            if *reset {
                requirements::clear_buffer_override(&mut ledger, &venues, venue, *device_type)?;
            } else {
                requirements::set_buffer_override(&mut ledger, &venues, venue, *device_type, *value)?;
            }
            ws.save(keys::DEVICE_LEDGER, &ledger)?;

            let shown = match (reset, value) {
                (false, Some(n)) => n.to_string(),
                _ => format!("{}%", ctx.cfg.buffer_percent),
            };
            ttlog(
                &pool.conn,
                "device_buffer_edit",
                venue,
                &format!("{} buffer set to {}", device_type, shown),
            )?;
            success(format!("{} buffer at {} set to {}", device_type, venue, shown));
        }

        DeviceCmd::Map { venue, device_ids } => {
            let venues: Vec<Venue> = ws.load(keys::VENUES)?;
            let v = find_venue(&venues, venue)?;

            let devices = device_ids
                .iter()
                .map(|id| find_device(id).ok_or_else(|| AppError::NotFound(format!("Device {}", id))))
                .collect::<AppResult<Vec<_>>>()?;

            let mut mapped: Vec<MappedDevice> = ws.load(keys::MAPPED_DEVICES)?;
            let outcome = mapping::map_devices(&mut mapped, v, &devices, ctx.operator(), ctx.now);
            ws.save(keys::MAPPED_DEVICES, &mapped)?;

            if !outcome.added.is_empty() {
                ttlog(
                    &pool.conn,
                    "device_map",
                    &v.venue_name,
                    &format!("Mapped {}", outcome.added.join(", ")),
                )?;
                success(format!(
                    "{} device(s) mapped to {}.",
                    outcome.added.len(),
                    v.venue_name
                ));
            }
            if !outcome.skipped.is_empty() {
                warning(format!("Already mapped, skipped: {}", outcome.skipped.join(", ")));
            }
        }

        DeviceCmd::Unmap { device_id, yes } => {
            let mut mapped: Vec<MappedDevice> = ws.load(keys::MAPPED_DEVICES)?;
            let Some(current) = mapped
                .iter()
                .find(|m| m.device_id.eq_ignore_ascii_case(device_id.trim()))
            else {
                return Err(AppError::NotFound(format!("Mapped device {}", device_id)));
            };

            if !*yes
                && !confirm(&format!(
                    "Remove {} from {}? This action is irreversible.",
                    current.device_id, current.venue_name
                ))?
            {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = mapping::unmap_device(&mut mapped, device_id)?;
            ws.save(keys::MAPPED_DEVICES, &mapped)?;
            ttlog(
                &pool.conn,
                "device_unmap",
                &removed.device_id,
                &format!("Removed from {}", removed.venue_name),
            )?;
            success(format!(
                "Device {} removed from {}.",
                removed.device_id, removed.venue_name
            ));
        }

        DeviceCmd::Mapped { venue } => {
            let mapped: Vec<MappedDevice> = ws.load(keys::MAPPED_DEVICES)?;
            let shown: Vec<&MappedDevice> = mapped
                .iter()
                .filter(|m| {
                    venue
                        .as_deref()
                        .is_none_or(|v| m.venue_name.eq_ignore_ascii_case(v.trim()))
                })
                .collect();

            if shown.is_empty() {
                info("No devices mapped.");
                return Ok(());
            }

            let mut t = Table::new(&["VENUE", "ID", "NAME", "TYPE", "PARTNER", "MAPPED AT", "BY"]);
            for m in shown {
                t.add_row(vec![
                    m.venue_name.clone(),
                    m.device_id.clone(),
                    m.device_name.clone(),
                    m.device_type.to_string(),
                    m.partner_name.clone(),
                    format_instant(&m.mapped_at),
                    m.mapped_by.clone(),
                ]);
            }
            print!("{}", t.render());
        }

        DeviceCmd::Available {
            venue,
            device_type,
            user,
        } => {
            let mapped: Vec<MappedDevice> = ws.load(keys::MAPPED_DEVICES)?;
            let records: Vec<AttendanceRecord> = ws.load(keys::ATTENDANCE)?;
            let options = available_devices(&mapped, &records, venue, *device_type, user);

            if options.is_empty() {
                info(format!("No {} mapped to {}.", device_type, venue));
                return Ok(());
            }

            let mut t = Table::new(&["ID", "NAME", "STATUS"]);
            for o in options {
                let status = match &o.held_by {
                    Some(holder) => format!("disabled (held by {})", holder),
                    None => "available".to_string(),
                };
                t.add_row(vec![
                    o.device.device_id.clone(),
                    o.device.device_name.clone(),
                    status,
                ]);
            }
            print!("{}", t.render());
        }

        DeviceCmd::Activity {
            action,
            venue,
            device_type,
            qty,
            remarks,
        } => {
            let venues: Vec<Venue> = ws.load(keys::VENUES)?;
            let mut ledger: Vec<RequirementLedger> = ws.load(keys::DEVICE_LEDGER)?;
            let mut activities: Vec<DeviceActivity> = ws.load(keys::DEVICE_ACTIVITIES)?;

            let a = requirements::log_activity(
                &mut activities,
                &mut ledger,
                &venues,
                venue,
                *device_type,
                *action,
                *qty,
                remarks,
                ctx.operator(),
                ctx.now,
            )?;

            ws.save(keys::DEVICE_ACTIVITIES, &activities)?;
            ws.save(keys::DEVICE_LEDGER, &ledger)?;
            ttlog(
                &pool.conn,
                "device_activity_add",
                &a.id,
                &format!(
                    "{} {} x {} at {}",
                    a.action.as_str(),
                    a.quantity,
                    a.device_type,
                    a.venue_name
                ),
            )?;
            success(format!(
                "Logged {} of {} x {} at {} ({})",
                a.action.as_str(),
                a.quantity,
                a.device_type,
                a.venue_name,
                a.id
            ));
        }

        DeviceCmd::Activities { venue } => {
            let activities: Vec<DeviceActivity> = ws.load(keys::DEVICE_ACTIVITIES)?;
            let shown: Vec<DeviceActivity> = activities
                .into_iter()
                .filter(|a| {
                    venue
                        .as_deref()
                        .is_none_or(|v| a.venue_name.eq_ignore_ascii_case(v.trim()))
                })
                .collect();
            print_report(&activities_table(&shown), "No device activity logged.");
        }
    }

    Ok(())
}

