use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Role allowed to cover more than one lab in a session.
pub const SERVER_MANAGER: &str = "Server Manager";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub partner_id: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_status")]
    pub status: String,
}

/// Partner organisation supplying staff or equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub partner_type: String,
    pub contact_person: String,
    pub phone: String,
    #[serde(default = "default_status")]
    pub status: String,
}

/// Fast-path registration, active for a limited time after `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyUser {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub aadhar: String,
    pub role: String,
    pub partner_id: String,
    pub face_image: String,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManpowerRole {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn default_status() -> String {
    "Active".to_string()
}
