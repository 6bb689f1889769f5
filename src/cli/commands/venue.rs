use crate::cli::AppContext;
use crate::cli::commands::print_report;
use crate::cli::parser::{MapCmd, ProjectCmd, VenueCmd};
use crate::core::mapping;
use crate::core::masters::find_by_id;
use crate::core::reports::mapping_table;
use crate::core::venues::{NewVenue, add_venue};
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::{keys, list_projects};
use crate::errors::AppResult;
use crate::models::people::{User, Vendor};
use crate::models::venue::{UserVenueMapping, Venue, VenuePartnerMapping};
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle_project(cmd: &ProjectCmd, ctx: &AppContext) -> AppResult<()> {
    match cmd {
        ProjectCmd::List => {
            let pool = ctx.open()?;
            let projects = list_projects(&pool.conn)?;
            if projects.is_empty() {
                info("No subprojects with stored data.");
            }
            for p in projects {
                let marker = if p == ctx.project { "*" } else { " " };
                println!("{} {}", marker, p);
            }
        }
    }
    Ok(())
}

pub fn handle_venue(cmd: &VenueCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let mut venues: Vec<Venue> = ws.load(keys::VENUES)?;

    match cmd {
        VenueCmd::Add {
            name,
            city,
            lat,
            lng,
            candidates,
            labs,
        } => {
            let v = add_venue(
                &mut venues,
                &NewVenue {
                    name: name.clone(),
                    city: city.clone(),
                    lat: *lat,
                    lng: *lng,
                    candidates: *candidates,
                    labs: labs.clone(),
                },
            )?;
            ws.save(keys::VENUES, &venues)?;
            ttlog(
                &pool.conn,
                "venue_add",
                &v.venue_id,
                &format!("Added venue {} ({}) in {}", v.venue_name, v.city, ctx.project),
            )?;
            success(format!("Venue {} added with id {}", v.venue_name, v.venue_id));
        }
        VenueCmd::List => {
            if venues.is_empty() {
                info(format!("No venues in subproject {}.", ctx.project));
                return Ok(());
            }
            let mut t = Table::new(&["ID", "NAME", "CITY", "LAT", "LNG", "CANDIDATES", "LABS"]);
            for v in &venues {
                t.add_row(vec![
                    v.venue_id.clone(),
                    v.venue_name.clone(),
                    v.city.clone(),
                    format!("{:.6}", v.lat),
                    format!("{:.6}", v.lng),
                    v.candidates.to_string(),
                    v.labs.join(", "),
                ]);
            }
            print!("{}", t.render());
        }
    }

    Ok(())
}

pub fn handle_map(cmd: &MapCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let venues: Vec<Venue> = ws.load(keys::VENUES)?;

    match cmd {
        MapCmd::Partner {
            partner,
            venues: names,
        } => {
            let vendors: Vec<Vendor> = ws.load_master(keys::VENDORS)?;
            let vendor = find_by_id(&vendors, partner, "Partner")?;
            let mut mappings: Vec<VenuePartnerMapping> = ws.load(keys::PARTNER_MAPPINGS)?;
            let m = mapping::map_partner(&mut mappings, vendor, &venues, names)?;
            ws.save(keys::PARTNER_MAPPINGS, &mappings)?;
            ttlog(
                &pool.conn,
                "partner_map",
                &m.partner_id,
                &format!("Mapped {} to {}", m.partner_name, names.join(", ")),
            )?;
            success(format!(
                "Partner {} now covers {} venue(s).",
                m.partner_name,
                m.venues.len()
            ));
        }
        MapCmd::User {
            user,
            venues: names,
        } => {
            let users: Vec<User> = ws.load_master(keys::USERS)?;
            let u = find_by_id(&users, user, "User")?;
            let mut mappings: Vec<UserVenueMapping> = ws.load(keys::USER_MAPPINGS)?;
            let m = mapping::map_user(&mut mappings, u, &venues, names)?;
            ws.save(keys::USER_MAPPINGS, &mappings)?;
            ttlog(
                &pool.conn,
                "user_map",
                &m.user_id,
                &format!("Mapped {} to {}", m.user_name, names.join(", ")),
            )?;
            success(format!(
                "User {} now assigned to {} venue(s).",
                m.user_name,
                m.venues.len()
            ));
        }
        MapCmd::List => {
            let partners: Vec<VenuePartnerMapping> = ws.load(keys::PARTNER_MAPPINGS)?;
            let users: Vec<UserVenueMapping> = ws.load(keys::USER_MAPPINGS)?;
            print_report(&mapping_table(&partners, &users), "No mappings yet.");
        }
    }

    Ok(())
}
