use crate::cli::AppContext;
use crate::cli::parser::Commands;
use crate::core::catalog::find_device;
use crate::core::mapping::{find_venue, map_devices};
use crate::core::masters::{NewUser, NewVendor, add_user, add_vendor};
use crate::core::reports;
use crate::core::requirements::requirement_rows;
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::keys;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportKind, ExportLogic, ReportTable};
use crate::import::{self, CsvRow, ImportKind, ImportReport};
use crate::models::attendance::AttendanceRecord;
use crate::models::device::{DeviceActivity, MappedDevice, RequirementLedger};
use crate::models::people::{User, Vendor};
use crate::models::venue::{UserVenueMapping, Venue, VenuePartnerMapping};
use crate::ui::messages::{success, warning};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    match cmd {
        Commands::Template { kind, file } => {
            let path = expand_tilde(file);
            import::write_template(&path, *kind)?;
            success(format!(
                "{} template written to {}",
                kind.as_str(),
                path.display()
            ));
        }

        Commands::Import { kind, file } => {
            let pool = ctx.open()?;
            let ws = Workspace::new(&pool.conn, &ctx.project);
            let path = expand_tilde(file);
            let rows = import::read_rows(&path, *kind)?;

            let report = match kind {
                ImportKind::Users => import_users(&ws, rows)?,
                ImportKind::Vendors => import_vendors(&ws, rows)?,
                ImportKind::Devices => import_devices(&ws, ctx, rows)?,
            };

            ttlog(
                &pool.conn,
                "import",
                kind.as_str(),
                &format!(
                    "{} row(s) imported, {} rejected",
                    report.imported,
                    report.errors.len()
                ),
            )?;

            if report.imported == 0 && !report.errors.is_empty() {
                return Err(AppError::Import(report.summary()));
            }

            success(format!("{} {} imported.", report.imported, kind.as_str()));
            if !report.errors.is_empty() {
                warning(format!("{} row(s) rejected:", report.errors.len()));
                println!("{}", report.summary());
            }
        }

        Commands::Export {
            what,
            format,
            file,
            force,
        } => {
            let pool = ctx.open()?;
            let ws = Workspace::new(&pool.conn, &ctx.project);
            let table = build_report(&ws, ctx, *what)?;

            if ExportLogic::export(&table, *format, file, *force)? {
                ttlog(
                    &pool.conn,
                    "export",
                    file,
                    &format!("{} rows of {} as {}", table.rows.len(), what.as_str(), format.as_str()),
                )?;
            }
        }

        _ => {}
    }

    Ok(())
}

fn build_report(ws: &Workspace<'_>, ctx: &AppContext, what: ExportKind) -> AppResult<ReportTable> {
    Ok(match what {
        ExportKind::Mapping => {
            let partners: Vec<VenuePartnerMapping> = ws.load(keys::PARTNER_MAPPINGS)?;
            let users: Vec<UserVenueMapping> = ws.load(keys::USER_MAPPINGS)?;
            reports::mapping_table(&partners, &users)
        }
        ExportKind::Attendance => {
            let records: Vec<AttendanceRecord> = ws.load(keys::ATTENDANCE)?;
            reports::attendance_table(&records)
        }
        ExportKind::Requirements => {
            let venues: Vec<Venue> = ws.load(keys::VENUES)?;
            let ledger: Vec<RequirementLedger> = ws.load(keys::DEVICE_LEDGER)?;
            reports::requirements_table(&requirement_rows(&venues, &ledger, ctx.cfg.buffer_percent))
        }
        ExportKind::Activities => {
            let activities: Vec<DeviceActivity> = ws.load(keys::DEVICE_ACTIVITIES)?;
            reports::activities_table(&activities)
        }
    })
}

fn import_users(ws: &Workspace<'_>, rows: Vec<AppResult<CsvRow>>) -> AppResult<ImportReport> {
    let vendors: Vec<Vendor> = ws.load_master(keys::VENDORS)?;
    let mut users: Vec<User> = ws.load_master(keys::USERS)?;

    let report = import::import_rows(rows, |row| {
        add_user(
            &mut users,
            &vendors,
            &NewUser {
                name: row.get("name").to_string(),
                mobile: row.get("mobile").to_string(),
                email: row.get("email").to_string(),
                role: row.get("role").to_string(),
                partner_id: row.get("partner_id").to_string(),
            },
        )
        .map(|_| ())
    });

    if report.imported > 0 {
        ws.save_master(keys::USERS, &users)?;
    }
    Ok(report)
}

fn import_vendors(ws: &Workspace<'_>, rows: Vec<AppResult<CsvRow>>) -> AppResult<ImportReport> {
    let mut vendors: Vec<Vendor> = ws.load_master(keys::VENDORS)?;

    let report = import::import_rows(rows, |row| {
        add_vendor(
            &mut vendors,
            &NewVendor {
                name: row.get("name").to_string(),
                partner_type: row.get("partner_type").to_string(),
                contact_person: row.get("contact_person").to_string(),
                phone: row.get("phone").to_string(),
            },
        )
        .map(|_| ())
    });

    if report.imported > 0 {
        ws.save_master(keys::VENDORS, &vendors)?;
    }
    Ok(report)
}

fn import_devices(
    ws: &Workspace<'_>,
    ctx: &AppContext,
    rows: Vec<AppResult<CsvRow>>,
) -> AppResult<ImportReport> {
    let venues: Vec<Venue> = ws.load(keys::VENUES)?;
    let mut mapped: Vec<MappedDevice> = ws.load(keys::MAPPED_DEVICES)?;

    let report = import::import_rows(rows, |row| {
        let venue = find_venue(&venues, row.get("venue_name"))?;
        let id = row.get("device_id");
        let device = find_device(id).ok_or_else(|| AppError::NotFound(format!("Device {}", id)))?;

        let outcome = map_devices(&mut mapped, venue, &[device], ctx.operator(), ctx.now);
        if outcome.added.is_empty() {
            return Err(AppError::Duplicate(format!("device {} is already mapped", device.device_id)));
        }
        Ok(())
    });

    if report.imported > 0 {
        ws.save(keys::MAPPED_DEVICES, &mapped)?;
    }
    Ok(report)
}
