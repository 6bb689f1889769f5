use crate::core::geo::validate_coordinates;
use crate::core::validation;
use crate::db::store::next_id;
use crate::errors::{AppError, AppResult};
use crate::models::venue::Venue;

#[derive(Debug, Clone, Default)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub candidates: u32,
    pub labs: Vec<String>,
}

pub fn add_venue(venues: &mut Vec<Venue>, new: &NewVenue) -> AppResult<Venue> {
    let venue_name = validation::require("venue name", &new.name)?;
    let city = validation::require("city", &new.city)?;
    validate_coordinates(new.lat, new.lng)?;

    if venues
        .iter()
        .any(|v| v.venue_name.eq_ignore_ascii_case(&venue_name))
    {
        return Err(AppError::Duplicate(format!("venue {}", venue_name)));
    }

    let mut labs: Vec<String> = new
        .labs
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    labs.dedup();

    let venue = Venue {
        venue_id: next_id("VEN", venues.iter().map(|v| v.venue_id.as_str())),
        venue_name,
        city,
        lat: new.lat,
        lng: new.lng,
        candidates: new.candidates,
        labs,
    };

    venues.push(venue.clone());
    Ok(venue)
}
