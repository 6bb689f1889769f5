use crate::cli::AppContext;
use crate::cli::parser::{NamedCmd, UserCmd, VendorCmd};
use crate::core::masters::{self, NewUser, NewVendor, remove_by_id};
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::keys;
use crate::errors::AppResult;
use crate::models::people::{AssetType, ManpowerRole, User, Vendor};
use crate::ui::messages::{info, success};
use crate::utils::formatting::{opt_or_dash, yes_no};
use crate::utils::table::Table;

pub fn handle_vendor(cmd: &VendorCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let mut vendors: Vec<Vendor> = ws.load_master(keys::VENDORS)?;

    match cmd {
        VendorCmd::Add {
            name,
            partner_type,
            contact,
            phone,
        } => {
            let v = masters::add_vendor(
                &mut vendors,
                &NewVendor {
                    name: name.clone(),
                    partner_type: partner_type.clone(),
                    contact_person: contact.clone(),
                    phone: phone.clone(),
                },
            )?;
            ws.save_master(keys::VENDORS, &vendors)?;
            ttlog(&pool.conn, "vendor_add", &v.id, &format!("Added vendor {}", v.name))?;
            success(format!("Vendor {} added with id {}", v.name, v.id));
        }
        VendorCmd::List => {
            if vendors.is_empty() {
                info("No vendors registered.");
                return Ok(());
            }
            let mut t = Table::new(&["ID", "NAME", "TYPE", "CONTACT", "PHONE", "STATUS"]);
            for v in &vendors {
                t.add_row(vec![
                    v.id.clone(),
                    v.name.clone(),
                    v.partner_type.clone(),
                    v.contact_person.clone(),
                    v.phone.clone(),
                    v.status.clone(),
                ]);
            }
            print!("{}", t.render());
        }
        VendorCmd::Del { id } => {
            let v = remove_by_id(&mut vendors, id, "Vendor")?;
            ws.save_master(keys::VENDORS, &vendors)?;
            ttlog(&pool.conn, "vendor_del", &v.id, &format!("Deleted vendor {}", v.name))?;
            success(format!("Vendor {} deleted.", v.id));
        }
    }

    Ok(())
}

pub fn handle_user(cmd: &UserCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let mut users: Vec<User> = ws.load_master(keys::USERS)?;

    match cmd {
        UserCmd::Add {
            name,
            mobile,
            email,
            role,
            partner,
        } => {
            let vendors: Vec<Vendor> = ws.load_master(keys::VENDORS)?;
            let u = masters::add_user(
                &mut users,
                &vendors,
                &NewUser {
                    name: name.clone(),
                    mobile: mobile.clone(),
                    email: email.clone(),
                    role: role.clone(),
                    partner_id: partner.clone(),
                },
            )?;
            ws.save_master(keys::USERS, &users)?;
            ttlog(
                &pool.conn,
                "user_add",
                &u.id,
                &format!("Added user {} ({})", u.name, u.role),
            )?;
            success(format!("User {} added with id {}", u.name, u.id));
        }
        UserCmd::List => {
            if users.is_empty() {
                info("No users registered.");
                return Ok(());
            }
            let mut t = Table::new(&["ID", "NAME", "MOBILE", "EMAIL", "ROLE", "PARTNER", "VERIFIED"]);
            for u in &users {
                t.add_row(vec![
                    u.id.clone(),
                    u.name.clone(),
                    u.mobile.clone(),
                    opt_or_dash(Some(&u.email)),
                    u.role.clone(),
                    opt_or_dash(Some(&u.partner_id)),
                    yes_no(u.verified).to_string(),
                ]);
            }
            print!("{}", t.render());
        }
        UserCmd::Verify { id } => {
            let u = masters::verify_user(&mut users, id)?;
            ws.save_master(keys::USERS, &users)?;
            ttlog(&pool.conn, "user_verify", &u.id, &format!("Verified user {}", u.name))?;
            success(format!("User {} verified.", u.id));
        }
        UserCmd::Del { id } => {
            let u = remove_by_id(&mut users, id, "User")?;
            ws.save_master(keys::USERS, &users)?;
            ttlog(&pool.conn, "user_del", &u.id, &format!("Deleted user {}", u.name))?;
            success(format!("User {} deleted.", u.id));
        }
    }

    Ok(())
}

pub fn handle_role(cmd: &NamedCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let mut roles: Vec<ManpowerRole> = ws.load_master(keys::MANPOWER_ROLES)?;

    match cmd {
        NamedCmd::Add { name, description } => {
            let r = masters::add_role(&mut roles, name, description)?;
            ws.save_master(keys::MANPOWER_ROLES, &roles)?;
            ttlog(&pool.conn, "role_add", &r.id, &format!("Added role {}", r.name))?;
            success(format!("Role {} added with id {}", r.name, r.id));
        }
        NamedCmd::List => {
            print_named("roles", roles.iter().map(|r| (&r.id, &r.name, &r.description)));
        }
        NamedCmd::Del { id } => {
            let r = remove_by_id(&mut roles, id, "Role")?;
            ws.save_master(keys::MANPOWER_ROLES, &roles)?;
            ttlog(&pool.conn, "role_del", &r.id, &format!("Deleted role {}", r.name))?;
            success(format!("Role {} deleted.", r.id));
        }
    }

    Ok(())
}

pub fn handle_asset_type(cmd: &NamedCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let mut assets: Vec<AssetType> = ws.load_master(keys::ASSET_TYPES)?;

    match cmd {
        NamedCmd::Add { name, description } => {
            let a = masters::add_asset_type(&mut assets, name, description)?;
            ws.save_master(keys::ASSET_TYPES, &assets)?;
            ttlog(&pool.conn, "asset_type_add", &a.id, &format!("Added asset type {}", a.name))?;
            success(format!("Asset type {} added with id {}", a.name, a.id));
        }
        NamedCmd::List => {
            print_named(
                "asset types",
                assets.iter().map(|a| (&a.id, &a.name, &a.description)),
            );
        }
        NamedCmd::Del { id } => {
            let a = remove_by_id(&mut assets, id, "Asset type")?;
            ws.save_master(keys::ASSET_TYPES, &assets)?;
            ttlog(&pool.conn, "asset_type_del", &a.id, &format!("Deleted asset type {}", a.name))?;
            success(format!("Asset type {} deleted.", a.id));
        }
    }

    Ok(())
}

fn print_named<'a, I>(what: &str, items: I)
where
    I: Iterator<Item = (&'a String, &'a String, &'a String)>,
{
    let mut t = Table::new(&["ID", "NAME", "DESCRIPTION"]);
    for (id, name, description) in items {
        t.add_row(vec![id.clone(), name.clone(), opt_or_dash(Some(description))]);
    }
    if t.is_empty() {
        info(format!("No {} registered.", what));
    } else {
        print!("{}", t.render());
    }
}
