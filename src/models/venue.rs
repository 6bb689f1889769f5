use serde::{Deserialize, Serialize};

/// Exam centre with fixed coordinates and candidate count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub venue_id: String,
    pub venue_name: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub candidates: u32,
    #[serde(default)]
    pub labs: Vec<String>,
}

/// Venue fields copied into mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRef {
    pub venue_id: String,
    pub venue_name: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<&Venue> for VenueRef {
    fn from(v: &Venue) -> Self {
        Self {
            venue_id: v.venue_id.clone(),
            venue_name: v.venue_name.clone(),
            city: v.city.clone(),
            lat: v.lat,
            lng: v.lng,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenuePartnerMapping {
    pub partner_id: String,
    pub partner_name: String,
    pub partner_type: String,
    pub venues: Vec<VenueRef>,
    pub contact_person: String,
    pub phone: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVenueMapping {
    pub partner_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_role: String,
    pub venues: Vec<VenueRef>,
}
