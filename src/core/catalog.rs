//! Fixed master catalog of devices available for venue mapping.

use crate::models::device::{Device, DeviceType};

const fn dev(
    device_id: &'static str,
    device_name: &'static str,
    device_type: DeviceType,
    partner_name: &'static str,
) -> Device {
    Device {
        device_id,
        device_name,
        device_type,
        partner_name,
    }
}

pub static DEVICE_CATALOG: &[Device] = &[
    dev("BIO-001", "Mantra MFS100 #1", DeviceType::Biometric, "SecureID Systems"),
    dev("BIO-002", "Mantra MFS100 #2", DeviceType::Biometric, "SecureID Systems"),
    dev("BIO-003", "Mantra MFS100 #3", DeviceType::Biometric, "SecureID Systems"),
    dev("BIO-004", "Morpho MSO1300 #1", DeviceType::Biometric, "Morpho Field Services"),
    dev("BIO-005", "Morpho MSO1300 #2", DeviceType::Biometric, "Morpho Field Services"),
    dev("BIO-006", "Morpho MSO1300 #3", DeviceType::Biometric, "Morpho Field Services"),
    dev("CCTV-001", "Hikvision Kit A", DeviceType::CctvKit, "EyeWatch CCTV"),
    dev("CCTV-002", "Hikvision Kit B", DeviceType::CctvKit, "EyeWatch CCTV"),
    dev("CCTV-003", "Hikvision Kit C", DeviceType::CctvKit, "EyeWatch CCTV"),
    dev("CCTV-004", "CP Plus Kit A", DeviceType::CctvKit, "Vigil Networks"),
    dev("CCTV-005", "CP Plus Kit B", DeviceType::CctvKit, "Vigil Networks"),
    dev("HHMD-001", "Garrett Super Scanner #1", DeviceType::MetalDetector, "Shield Security"),
    dev("HHMD-002", "Garrett Super Scanner #2", DeviceType::MetalDetector, "Shield Security"),
    dev("HHMD-003", "Garrett Super Scanner #3", DeviceType::MetalDetector, "Shield Security"),
    dev("JAM-001", "SignalBlock 4G #1", DeviceType::Jammer, "Vigil Networks"),
    dev("JAM-002", "SignalBlock 4G #2", DeviceType::Jammer, "Vigil Networks"),
    dev("LAP-001", "ThinkPad E14 #1", DeviceType::Laptop, "TechServe Rentals"),
    dev("LAP-002", "ThinkPad E14 #2", DeviceType::Laptop, "TechServe Rentals"),
    dev("LAP-003", "Latitude 3440 #1", DeviceType::Laptop, "TechServe Rentals"),
];

/// Catalog entries matching every given filter. `search` is a
/// case-insensitive substring of id, name or partner.
pub fn filter_catalog(
    device_type: Option<DeviceType>,
    partner: Option<&str>,
    search: Option<&str>,
) -> Vec<&'static Device> {
    let partner = partner.map(|p| p.trim().to_lowercase());
    let search = search.map(|s| s.trim().to_lowercase());

    DEVICE_CATALOG
        .iter()
        .filter(|d| device_type.is_none_or(|t| d.device_type == t))
        .filter(|d| {
            partner
                .as_deref()
                .is_none_or(|p| d.partner_name.to_lowercase().contains(p))
        })
        .filter(|d| {
            search.as_deref().is_none_or(|s| {
                d.device_id.to_lowercase().contains(s)
                    || d.device_name.to_lowercase().contains(s)
                    || d.partner_name.to_lowercase().contains(s)
            })
        })
        .collect()
}

pub fn find_device(device_id: &str) -> Option<&'static Device> {
    DEVICE_CATALOG
        .iter()
        .find(|d| d.device_id.eq_ignore_ascii_case(device_id.trim()))
}
