use super::device::DeviceType;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Device identity kept on a record after deallocation, for audit display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRef {
    pub device_id: String,
    pub device_name: String,
    pub device_type: DeviceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub venue_name: String,
    pub labs: Vec<String>,
    pub device_id: Option<String>,
    pub device_name: Option<String>,
    pub device_type: Option<DeviceType>,
    pub face_image: String,
    pub allotted_by: String,
    pub allotted_on: DateTime<Local>,
    pub present: bool,
    pub checkin_lat: f64,
    pub checkin_lng: f64,
    /// Metres from the venue at check-in
    pub checkin_distance: f64,
    #[serde(default)]
    pub deallocated_by: Option<String>,
    #[serde(default)]
    pub deallocated_on: Option<DateTime<Local>>,
    #[serde(default)]
    pub deallocation_prev: Option<DeviceRef>,
}

impl AttendanceRecord {
    /// A record still holding its device.
    pub fn is_active(&self) -> bool {
        self.present && self.device_id.is_some() && self.deallocated_on.is_none()
    }

    pub fn holds_device(&self, device_id: &str) -> bool {
        self.is_active()
            && self
                .device_id
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(device_id))
    }
}
