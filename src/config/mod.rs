use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

const MAX_CHECKLIST_HOURS: f64 = 168.0;
const MAX_EMERGENCY_VALIDITY_HOURS: i64 = 8760;
const MAX_BUFFER_PERCENT: u32 = 1000;

/// Time window of one venue checklist, relative to the session it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChecklistWindow {
    /// Hours before session start when the checklist opens
    pub enable_before_hours: f64,
    /// Hours after session end when the checklist closes
    pub disable_after_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_project")]
    pub default_project: String,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default = "default_geofence_radius")]
    pub geofence_radius_m: f64,
    #[serde(default)]
    pub geofence_exempt_venues: Vec<String>,
    #[serde(default = "default_buffer_percent")]
    pub buffer_percent: u32,
    #[serde(default = "default_emergency_validity")]
    pub emergency_validity_hours: i64,
    #[serde(default = "default_checklist1")]
    pub checklist1: ChecklistWindow,
    #[serde(default = "default_checklist2")]
    pub checklist2: ChecklistWindow,
}

fn default_project() -> String {
    "default".to_string()
}
fn default_operator() -> String {
    "admin".to_string()
}
fn default_geofence_radius() -> f64 {
    100.0
}
fn default_buffer_percent() -> u32 {
    10
}
fn default_emergency_validity() -> i64 {
    24
}
fn default_checklist1() -> ChecklistWindow {
    ChecklistWindow {
        enable_before_hours: 1.0,
        disable_after_hours: 0.0,
    }
}
fn default_checklist2() -> ChecklistWindow {
    ChecklistWindow {
        enable_before_hours: 0.5,
        disable_after_hours: 1.0,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    /// Defaults pointing at the given database file.
    pub fn with_database(db: impl AsRef<Path>) -> Self {
        Self {
            database: db.as_ref().to_string_lossy().to_string(),
            default_project: default_project(),
            operator: default_operator(),
            geofence_radius_m: default_geofence_radius(),
            geofence_exempt_venues: Vec::new(),
            buffer_percent: default_buffer_percent(),
            emergency_validity_hours: default_emergency_validity(),
            checklist1: default_checklist1(),
            checklist2: default_checklist2(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vbsa")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".vbsa")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("vbsa.conf")
    }

    /// Return the full path of the SQLite store
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("vbsa.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Self::from_yaml(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse a YAML document and reject values outside the supported ranges.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config =
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range checks for the numeric settings that feed time and distance
    /// arithmetic.
    pub fn validate(&self) -> AppResult<()> {
        if !self.geofence_radius_m.is_finite() || self.geofence_radius_m <= 0.0 {
            return Err(AppError::Config(format!(
                "geofence_radius_m must be a positive number, found {}",
                self.geofence_radius_m
            )));
        }

        if !(1..=MAX_EMERGENCY_VALIDITY_HOURS).contains(&self.emergency_validity_hours) {
            return Err(AppError::Config(format!(
                "emergency_validity_hours must be between 1 and {}, found {}",
                MAX_EMERGENCY_VALIDITY_HOURS, self.emergency_validity_hours
            )));
        }

        if self.buffer_percent > MAX_BUFFER_PERCENT {
            return Err(AppError::Config(format!(
                "buffer_percent must be at most {}, found {}",
                MAX_BUFFER_PERCENT, self.buffer_percent
            )));
        }

        for (name, w) in [("checklist1", &self.checklist1), ("checklist2", &self.checklist2)] {
            for (field, h) in [
                ("enable_before_hours", w.enable_before_hours),
                ("disable_after_hours", w.disable_after_hours),
            ] {
                if !h.is_finite() || !(0.0..=MAX_CHECKLIST_HOURS).contains(&h) {
                    return Err(AppError::Config(format!(
                        "{}.{} must be between 0 and {}, found {}",
                        name, field, MAX_CHECKLIST_HOURS, h
                    )));
                }
            }
        }

        Ok(())
    }

    /// Write the configuration to the standard config file.
    pub fn save(&self) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::create_dir_all(Self::config_dir())?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// True when the venue is excluded from the attendance geofence.
    pub fn is_geofence_exempt(&self, venue_name: &str) -> bool {
        self.geofence_exempt_venues
            .iter()
            .any(|v| v.eq_ignore_ascii_case(venue_name.trim()))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("vbsa.sqlite")
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config::with_database(&db_path);
            config.save().map_err(|e| io::Error::other(e.to_string()))?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
