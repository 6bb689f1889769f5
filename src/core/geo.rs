//! Geofencing around venue coordinates.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::venue::Venue;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres.
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn validate_coordinates(lat: f64, lng: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&lat) || lat.is_nan() {
        return Err(AppError::invalid("latitude", format!("{} is out of range", lat)));
    }
    if !(-180.0..=180.0).contains(&lng) || lng.is_nan() {
        return Err(AppError::invalid("longitude", format!("{} is out of range", lng)));
    }
    Ok(())
}

/// Distance from the venue; an error when outside the configured radius,
/// unless the venue is exempt.
pub fn check_geofence(venue: &Venue, lat: f64, lng: f64, cfg: &Config) -> AppResult<f64> {
    validate_coordinates(lat, lng)?;
    let distance = haversine_m(venue.lat, venue.lng, lat, lng);

    if distance > cfg.geofence_radius_m && !cfg.is_geofence_exempt(&venue.venue_name) {
        return Err(AppError::Geofence {
            distance,
            radius: cfg.geofence_radius_m,
        });
    }

    Ok(distance)
}
