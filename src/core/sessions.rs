//! Session expansion: templates × selected dates, with per-date overrides.

use crate::errors::{AppError, AppResult};
use crate::models::session::{DateSessionOverride, SessionInstance, SessionTemplate, session_id};
use crate::utils::time::local_datetime;
use chrono::{NaiveDate, NaiveTime};

fn check_order(start: NaiveTime, end: NaiveTime) -> AppResult<()> {
    if end <= start {
        return Err(AppError::InvalidTime(format!(
            "session end {} must be later than start {}",
            end.format("%H:%M"),
            start.format("%H:%M")
        )));
    }
    Ok(())
}

/// Concrete sessions for every (date, template) pair, ordered by date then
/// template order. Disabled overrides drop their slot; enabled ones replace
/// the template times for that date only.
pub fn expand_sessions(
    dates: &[NaiveDate],
    templates: &[SessionTemplate],
    overrides: &[DateSessionOverride],
) -> AppResult<Vec<SessionInstance>> {
    let mut sorted = dates.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut out = Vec::with_capacity(sorted.len() * templates.len());

    for date in sorted {
        for tpl in templates {
            let ov = overrides
                .iter()
                .find(|o| o.date == date && o.template_id == tpl.id);

            let (start, end) = match ov {
                Some(o) if !o.enabled => continue,
                Some(o) => (o.start_time, o.end_time),
                None => (tpl.start_time, tpl.end_time),
            };

            out.push(SessionInstance {
                id: session_id(date, &tpl.id),
                date,
                template_id: tpl.id.clone(),
                label: tpl.label.clone(),
                start: local_datetime(date, start)?,
                end: local_datetime(date, end)?,
            });
        }
    }

    Ok(out)
}

/// Append a template with the next free `S<n>` id.
pub fn add_template(
    templates: &mut Vec<SessionTemplate>,
    label: Option<&str>,
    start: NaiveTime,
    end: NaiveTime,
) -> AppResult<SessionTemplate> {
    check_order(start, end)?;

    let n = templates
        .iter()
        .filter_map(|t| t.id.strip_prefix('S'))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;

    let id = format!("S{}", n);
    let label = label
        .map(str::to_string)
        .unwrap_or_else(|| format!("Session-{}", n));

    let tpl = SessionTemplate::new(&id, &label, start, end);
    templates.push(tpl.clone());
    Ok(tpl)
}

/// Change a template's default times. Existing per-date overrides keep
/// their own times.
pub fn set_template_time(
    templates: &mut [SessionTemplate],
    template_id: &str,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
) -> AppResult<SessionTemplate> {
    let tpl = templates
        .iter_mut()
        .find(|t| t.id.eq_ignore_ascii_case(template_id))
        .ok_or_else(|| AppError::NotFound(format!("Session template {}", template_id)))?;

    let new_start = start.unwrap_or(tpl.start_time);
    let new_end = end.unwrap_or(tpl.end_time);
    check_order(new_start, new_end)?;

    tpl.start_time = new_start;
    tpl.end_time = new_end;
    Ok(tpl.clone())
}

/// Create or update the override for one (date, template). A new override
/// starts from the template times. The template itself is never touched.
pub fn override_session(
    overrides: &mut Vec<DateSessionOverride>,
    templates: &[SessionTemplate],
    date: NaiveDate,
    template_id: &str,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
    enabled: Option<bool>,
) -> AppResult<DateSessionOverride> {
    let tpl = templates
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(template_id))
        .ok_or_else(|| AppError::NotFound(format!("Session template {}", template_id)))?;

    let existing = overrides
        .iter()
        .position(|o| o.date == date && o.template_id == tpl.id);

    let mut ov = match existing {
        Some(i) => overrides[i].clone(),
        None => DateSessionOverride {
            date,
            template_id: tpl.id.clone(),
            start_time: tpl.start_time,
            end_time: tpl.end_time,
            enabled: true,
        },
    };

    ov.start_time = start.unwrap_or(ov.start_time);
    ov.end_time = end.unwrap_or(ov.end_time);
    check_order(ov.start_time, ov.end_time)?;
    if let Some(e) = enabled {
        ov.enabled = e;
    }

    match existing {
        Some(i) => overrides[i] = ov.clone(),
        None => overrides.push(ov.clone()),
    }

    Ok(ov)
}

pub fn find_session<'a>(sessions: &'a [SessionInstance], id: &str) -> AppResult<&'a SessionInstance> {
    sessions
        .iter()
        .find(|s| s.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))
}
