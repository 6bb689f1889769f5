pub mod attendance;
pub mod backup;
pub mod catalog;
pub mod checklist;
pub mod config;
pub mod emergency;
pub mod geo;
pub mod log;
pub mod mapping;
pub mod masters;
pub mod reports;
pub mod requirements;
pub mod sessions;
pub mod validation;
pub mod venues;
pub mod workspace;
