//! Master data: users, vendors, manpower roles and asset types.

use crate::core::validation;
use crate::db::store::next_id;
use crate::errors::{AppError, AppResult};
use crate::models::people::{AssetType, ManpowerRole, User, Vendor};

/// Records addressed by a string id.
pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for User {
    fn id(&self) -> &str {
        &self.id
    }
}
impl HasId for Vendor {
    fn id(&self) -> &str {
        &self.id
    }
}
impl HasId for ManpowerRole {
    fn id(&self) -> &str {
        &self.id
    }
}
impl HasId for AssetType {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn find_by_id<'a, T: HasId>(items: &'a [T], id: &str, what: &str) -> AppResult<&'a T> {
    items
        .iter()
        .find(|i| i.id().eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| AppError::NotFound(format!("{} {}", what, id)))
}

pub fn remove_by_id<T: HasId>(items: &mut Vec<T>, id: &str, what: &str) -> AppResult<T> {
    let idx = items
        .iter()
        .position(|i| i.id().eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| AppError::NotFound(format!("{} {}", what, id)))?;
    Ok(items.remove(idx))
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub role: String,
    pub partner_id: String,
}

/// Validate and append a user. New users start unverified.
pub fn add_user(users: &mut Vec<User>, vendors: &[Vendor], new: &NewUser) -> AppResult<User> {
    let name = validation::require("name", &new.name)?;
    let mobile = validation::mobile(&new.mobile)?;
    let email = validation::optional_email(&new.email)?;
    let role = validation::require("role", &new.role)?;

    let partner_id = new.partner_id.trim().to_string();
    if !partner_id.is_empty() {
        find_by_id(vendors, &partner_id, "Partner")?;
    }

    if users.iter().any(|u| u.mobile == mobile) {
        return Err(AppError::Duplicate(format!("mobile number {}", mobile)));
    }

    let user = User {
        id: next_id("USR", users.iter().map(|u| u.id.as_str())),
        name,
        mobile,
        email,
        role,
        partner_id,
        verified: false,
        status: "Active".to_string(),
    };

    users.push(user.clone());
    Ok(user)
}

pub fn verify_user(users: &mut [User], id: &str) -> AppResult<User> {
    let user = users
        .iter_mut()
        .find(|u| u.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;
    user.verified = true;
    Ok(user.clone())
}

#[derive(Debug, Clone, Default)]
pub struct NewVendor {
    pub name: String,
    pub partner_type: String,
    pub contact_person: String,
    pub phone: String,
}

pub fn add_vendor(vendors: &mut Vec<Vendor>, new: &NewVendor) -> AppResult<Vendor> {
    let name = validation::require("name", &new.name)?;
    let partner_type = validation::require("partner type", &new.partner_type)?;
    let contact_person = validation::require("contact person", &new.contact_person)?;
    let phone = validation::mobile(&new.phone)?;

    if vendors.iter().any(|v| v.name.eq_ignore_ascii_case(&name)) {
        return Err(AppError::Duplicate(format!("vendor {}", name)));
    }

    let vendor = Vendor {
        id: next_id("VND", vendors.iter().map(|v| v.id.as_str())),
        name,
        partner_type,
        contact_person,
        phone,
        status: "Active".to_string(),
    };

    vendors.push(vendor.clone());
    Ok(vendor)
}

pub fn add_role(roles: &mut Vec<ManpowerRole>, name: &str, description: &str) -> AppResult<ManpowerRole> {
    let name = validation::require("name", name)?;
    if roles.iter().any(|r| r.name.eq_ignore_ascii_case(&name)) {
        return Err(AppError::Duplicate(format!("role {}", name)));
    }
    let role = ManpowerRole {
        id: next_id("ROL", roles.iter().map(|r| r.id.as_str())),
        name,
        description: description.trim().to_string(),
    };
    roles.push(role.clone());
    Ok(role)
}

pub fn add_asset_type(
    assets: &mut Vec<AssetType>,
    name: &str,
    description: &str,
) -> AppResult<AssetType> {
    let name = validation::require("name", name)?;
    if assets.iter().any(|a| a.name.eq_ignore_ascii_case(&name)) {
        return Err(AppError::Duplicate(format!("asset type {}", name)));
    }
    let asset = AssetType {
        id: next_id("AST", assets.iter().map(|a| a.id.as_str())),
        name,
        description: description.trim().to_string(),
    };
    assets.push(asset.clone());
    Ok(asset)
}
