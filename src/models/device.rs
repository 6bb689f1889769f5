use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device categories with a fixed allocation ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "Biometric Device")]
    Biometric,
    #[serde(rename = "CCTV Kit")]
    CctvKit,
    #[serde(rename = "Handheld Metal Detector")]
    MetalDetector,
    #[serde(rename = "Mobile Signal Jammer")]
    Jammer,
    #[serde(rename = "Laptop")]
    Laptop,
}

/// `count` devices for every `divisor` candidates, plus a flat `extra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRatio {
    pub count: u32,
    pub divisor: u32,
    pub extra: u32,
}

impl DeviceType {
    pub const ALL: [DeviceType; 5] = [
        DeviceType::Biometric,
        DeviceType::CctvKit,
        DeviceType::MetalDetector,
        DeviceType::Jammer,
        DeviceType::Laptop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DeviceType::Biometric => "Biometric Device",
            DeviceType::CctvKit => "CCTV Kit",
            DeviceType::MetalDetector => "Handheld Metal Detector",
            DeviceType::Jammer => "Mobile Signal Jammer",
            DeviceType::Laptop => "Laptop",
        }
    }

    pub fn ratio(&self) -> DeviceRatio {
        let (count, divisor, extra) = match self {
            DeviceType::Biometric => (1, 50, 0),
            DeviceType::CctvKit => (1, 25, 5),
            DeviceType::MetalDetector => (1, 100, 0),
            DeviceType::Jammer => (1, 30, 0),
            DeviceType::Laptop => (1, 250, 0),
        };
        DeviceRatio {
            count,
            divisor,
            extra,
        }
    }

    /// Accepts the display name or a short code (`biometric`, `cctv`, `hhmd`, `jammer`, `laptop`).
    pub fn from_name(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "biometric" | "biometric device" => Some(DeviceType::Biometric),
            "cctv" | "cctv kit" => Some(DeviceType::CctvKit),
            "hhmd" | "handheld metal detector" => Some(DeviceType::MetalDetector),
            "jammer" | "mobile signal jammer" => Some(DeviceType::Jammer),
            "laptop" => Some(DeviceType::Laptop),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entry of the fixed device master catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub device_id: &'static str,
    pub device_name: &'static str,
    pub device_type: DeviceType,
    pub partner_name: &'static str,
}

/// Concrete device assigned to a venue. Unique by `device_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedDevice {
    pub venue_name: String,
    pub device_type: DeviceType,
    pub device_id: String,
    pub device_name: String,
    pub partner_name: String,
    pub mapped_at: DateTime<Local>,
    pub mapped_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceAction {
    Send,
    Receive,
}

impl DeviceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceAction::Send => "send",
            DeviceAction::Receive => "receive",
        }
    }
}

/// Immutable logistics log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceActivity {
    pub id: String,
    pub venue_name: String,
    pub device_type: DeviceType,
    pub action: DeviceAction,
    pub quantity: u32,
    pub remarks: String,
    pub timestamp: DateTime<Local>,
    pub logged_by: String,
}

/// Stored counters of one (venue, device type) requirement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementLedger {
    pub venue_name: String,
    pub device_type: DeviceType,
    #[serde(default)]
    pub buffer_override: Option<u32>,
    #[serde(default)]
    pub sent: u32,
    #[serde(default)]
    pub received: u32,
}

impl RequirementLedger {
    pub fn new(venue_name: &str, device_type: DeviceType) -> Self {
        Self {
            venue_name: venue_name.to_string(),
            device_type,
            buffer_override: None,
            sent: 0,
            received: 0,
        }
    }
}

/// Computed requirement row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRequirementRow {
    pub venue_name: String,
    pub device_type: DeviceType,
    pub candidates: u32,
    pub required: u32,
    pub buffer: u32,
    pub sent: u32,
    pub received: u32,
}

impl DeviceRequirementRow {
    pub fn total(&self) -> u32 {
        self.required.saturating_add(self.buffer)
    }

    pub fn variance(&self) -> Variance {
        Variance::classify(self.received, self.total())
    }
}

/// Received quantity compared with the required total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Surplus(u32),
    Deficient(u32),
    Match,
}

impl Variance {
    pub fn classify(received: u32, total: u32) -> Self {
        if received > total {
            Variance::Surplus(received - total)
        } else if received < total {
            Variance::Deficient(total - received)
        } else {
            Variance::Match
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Variance::Surplus(_) => "Surplus",
            Variance::Deficient(_) => "Deficient",
            Variance::Match => "Match",
        }
    }

    /// Signed difference: "+2", "-2" or "0".
    pub fn signed(&self) -> String {
        match self {
            Variance::Surplus(n) => format!("+{}", n),
            Variance::Deficient(n) => format!("-{}", n),
            Variance::Match => "0".to_string(),
        }
    }
}
