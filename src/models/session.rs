use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Recurring time slot applied to every selected exam date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTemplate {
    pub id: String,
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SessionTemplate {
    pub fn new(id: &str, label: &str, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            start_time,
            end_time,
        }
    }

    /// Session-1 09:00–12:00 and Session-2 14:00–17:00.
    pub fn defaults() -> Vec<Self> {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
        vec![
            Self::new("S1", "Session-1", t(9), t(12)),
            Self::new("S2", "Session-2", t(14), t(17)),
        ]
    }
}

/// Per-date deviation from a template, keyed by (date, template_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSessionOverride {
    pub date: NaiveDate,
    pub template_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub enabled: bool,
}

/// A concrete session on a concrete date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInstance {
    pub id: String,
    pub date: NaiveDate,
    pub template_id: String,
    pub label: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Upcoming,
    Live,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Upcoming => "upcoming",
            SessionStatus::Live => "live",
            SessionStatus::Completed => "completed",
        }
    }
}

impl SessionInstance {
    pub fn status(&self, now: DateTime<Local>) -> SessionStatus {
        if now < self.start {
            SessionStatus::Upcoming
        } else if now <= self.end {
            SessionStatus::Live
        } else {
            SessionStatus::Completed
        }
    }

    pub fn time_range(&self) -> String {
        format!("{}–{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Session id as shown to users: `<date>_<template id>`.
pub fn session_id(date: NaiveDate, template_id: &str) -> String {
    format!("{}_{}", date.format("%Y-%m-%d"), template_id)
}
