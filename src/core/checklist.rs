//! Venue checklist availability windows and submissions.

use crate::config::{ChecklistWindow, Config};
use crate::errors::{AppError, AppResult};
use crate::models::checklist::{ChecklistState, ChecklistSubmission, ChecklistType};
use crate::models::session::SessionInstance;
use crate::utils::time::hours;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

fn window_config(cfg: &Config, ty: ChecklistType) -> ChecklistWindow {
    match ty {
        ChecklistType::Checklist1 => cfg.checklist1,
        ChecklistType::Checklist2 => cfg.checklist2,
    }
}

/// `[start − enable_before, end + disable_after]`
pub fn window(
    session: &SessionInstance,
    ty: ChecklistType,
    cfg: &Config,
) -> (DateTime<Local>, DateTime<Local>) {
    let w = window_config(cfg, ty);
    (
        session.start - hours(w.enable_before_hours),
        session.end + hours(w.disable_after_hours),
    )
}

/// Inclusive on both ends.
pub fn is_enabled(
    session: &SessionInstance,
    ty: ChecklistType,
    cfg: &Config,
    now: DateTime<Local>,
) -> bool {
    let (open, close) = window(session, ty, cfg);
    open <= now && now <= close
}

pub fn find_submission<'a>(
    submissions: &'a [ChecklistSubmission],
    session_id: &str,
    ty: ChecklistType,
) -> Option<&'a ChecklistSubmission> {
    submissions
        .iter()
        .find(|s| s.session_id == session_id && s.checklist_type == ty)
}

pub fn state(
    session: &SessionInstance,
    ty: ChecklistType,
    cfg: &Config,
    submissions: &[ChecklistSubmission],
    now: DateTime<Local>,
) -> ChecklistState {
    if let Some(s) = find_submission(submissions, &session.id, ty) {
        return ChecklistState::Submitted {
            at: s.actual_submit_time,
        };
    }

    let (open, close) = window(session, ty, cfg);
    if now < open {
        ChecklistState::NotYetOpen { opens_at: open }
    } else if now > close {
        ChecklistState::Closed { closed_at: close }
    } else {
        ChecklistState::Open { closes_at: close }
    }
}

/// Store a submission while the window is open. A later submission for the
/// same (session, checklist) replaces the earlier one.
pub fn submit(
    submissions: &mut Vec<ChecklistSubmission>,
    session: &SessionInstance,
    ty: ChecklistType,
    cfg: &Config,
    fields: BTreeMap<String, String>,
    submitted_by: &str,
    now: DateTime<Local>,
) -> AppResult<ChecklistSubmission> {
    let (open, close) = window(session, ty, cfg);

    if now < open || now > close {
        let reason = if now < open {
            format!("opens at {}", open.format("%Y-%m-%d %H:%M"))
        } else {
            format!("closed at {}", close.format("%Y-%m-%d %H:%M"))
        };
        return Err(AppError::ChecklistClosed {
            checklist: ty.label().to_string(),
            session_id: session.id.clone(),
            reason,
        });
    }

    let submission = ChecklistSubmission {
        session_id: session.id.clone(),
        checklist_type: ty,
        scheduled_time: open,
        actual_submit_time: now,
        submitted_by: submitted_by.to_string(),
        fields,
    };

    match submissions
        .iter_mut()
        .find(|s| s.session_id == session.id && s.checklist_type == ty)
    {
        Some(existing) => *existing = submission.clone(),
        None => submissions.push(submission.clone()),
    }

    Ok(submission)
}

/// Parse `key=value` form fields.
pub fn parse_fields(raw: &[String]) -> AppResult<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for item in raw {
        let (k, v) = item
            .split_once('=')
            .ok_or_else(|| AppError::invalid("field", format!("'{}' is not key=value", item)))?;
        let key = k.trim();
        if key.is_empty() {
            return Err(AppError::invalid("field", format!("'{}' has an empty key", item)));
        }
        out.insert(key.to_string(), v.trim().to_string());
    }
    Ok(out)
}
