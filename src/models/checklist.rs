use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistType {
    Checklist1,
    Checklist2,
}

impl ChecklistType {
    pub const ALL: [ChecklistType; 2] = [ChecklistType::Checklist1, ChecklistType::Checklist2];

    pub fn label(&self) -> &'static str {
        match self {
            ChecklistType::Checklist1 => "Checklist-1",
            ChecklistType::Checklist2 => "Checklist-2",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "checklist1" | "1" => Some(ChecklistType::Checklist1),
            "checklist2" | "2" => Some(ChecklistType::Checklist2),
            _ => None,
        }
    }
}

/// At most one per (session_id, checklist_type); resubmission overwrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSubmission {
    pub session_id: String,
    pub checklist_type: ChecklistType,
    pub scheduled_time: DateTime<Local>,
    pub actual_submit_time: DateTime<Local>,
    pub submitted_by: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// What a checklist action looks like at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub enum ChecklistState {
    NotYetOpen { opens_at: DateTime<Local> },
    Open { closes_at: DateTime<Local> },
    Closed { closed_at: DateTime<Local> },
    Submitted { at: DateTime<Local> },
}

impl ChecklistState {
    pub fn describe(&self) -> String {
        match self {
            ChecklistState::NotYetOpen { opens_at } => {
                format!("opens at {}", opens_at.format("%Y-%m-%d %H:%M"))
            }
            ChecklistState::Open { closes_at } => {
                format!("open until {}", closes_at.format("%Y-%m-%d %H:%M"))
            }
            ChecklistState::Closed { closed_at } => {
                format!("closed at {}", closed_at.format("%Y-%m-%d %H:%M"))
            }
            ChecklistState::Submitted { at } => {
                format!("Submitted at {}", at.format("%Y-%m-%d %H:%M"))
            }
        }
    }
}
