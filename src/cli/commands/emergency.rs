use crate::cli::AppContext;
use crate::cli::parser::EmergencyCmd;
use crate::core::emergency::{self, EmergencyRequest};
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::keys;
use crate::errors::AppResult;
use crate::models::people::{EmergencyUser, User};
use crate::ui::messages::{info, success};
use crate::utils::table::Table;
use crate::utils::time::format_instant;

pub fn handle(cmd: &EmergencyCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let mut registered: Vec<EmergencyUser> = ws.load(keys::EMERGENCY_USERS)?;
    let hours = ctx.cfg.emergency_validity_hours;

    match cmd {
        EmergencyCmd::Add {
            name,
            mobile,
            aadhar,
            role,
            partner,
            photo,
        } => {
            let users: Vec<User> = ws.load_master(keys::USERS)?;
            let req = EmergencyRequest {
                name: name.clone(),
                mobile: mobile.clone(),
                aadhar: aadhar.clone(),
                role: role.clone(),
                partner_id: partner.clone(),
                face_image: photo.clone(),
            };

            let u = emergency::onboard(&mut registered, &users, &req, ctx.now, hours)?;
            ws.save(keys::EMERGENCY_USERS, &registered)?;
            ttlog(
                &pool.conn,
                "emergency_add",
                &u.id,
                &format!("Emergency onboarding of {} ({})", u.name, u.role),
            )?;
            let until = emergency::expires_at(&u, hours)
                .map(|end| format_instant(&end))
                .unwrap_or_else(|| "further notice".to_string());
            success(format!("{} registered as {} until {}", u.name, u.id, until));
        }

        EmergencyCmd::List { all } => {
            let shown: Vec<&EmergencyUser> = if *all {
                registered.iter().collect()
            } else {
                emergency::active(&registered, ctx.now, hours)
            };

            if shown.is_empty() {
                info("No active emergency registrations.");
                return Ok(());
            }

            let mut t = Table::new(&["ID", "NAME", "MOBILE", "ROLE", "PARTNER", "CREATED", "REMAINING"]);
            for u in shown {
                let left = emergency::remaining(u, ctx.now, hours);
                let remaining = if left.is_zero() {
                    "expired".to_string()
                } else {
                    format!("{}h {:02}m", left.num_hours(), left.num_minutes() % 60)
                };
                t.add_row(vec![
                    u.id.clone(),
                    u.name.clone(),
                    u.mobile.clone(),
                    u.role.clone(),
                    u.partner_id.clone(),
                    format_instant(&u.created_at),
                    remaining,
                ]);
            }
            print!("{}", t.render());
        }
    }

    Ok(())
}
