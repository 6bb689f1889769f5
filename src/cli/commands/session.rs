use crate::cli::AppContext;
use crate::cli::parser::SessionCmd;
use crate::core::sessions;
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::keys;
use crate::errors::{AppError, AppResult};
use crate::models::session::{DateSessionOverride, SessionTemplate};
use crate::ui::messages::{info, success};
use crate::utils::colors::{color_for_status, paint};
use crate::utils::date::{expand_dates, parse_date};
use crate::utils::table::Table;
use crate::utils::time::{parse_optional_time, parse_time};
use chrono::NaiveDate;

fn required_time(s: &str) -> AppResult<chrono::NaiveTime> {
    parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

pub fn handle(cmd: &SessionCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);

    match cmd {
        SessionCmd::AddTemplate { start, end, label } => {
            let mut templates = ws.templates()?;
            let tpl = sessions::add_template(
                &mut templates,
                label.as_deref(),
                required_time(start)?,
                required_time(end)?,
            )?;
            ws.save(keys::SESSION_TEMPLATES, &templates)?;
            ttlog(
                &pool.conn,
                "session_template_add",
                &tpl.id,
                &format!("{} {}", tpl.label, describe(&tpl)),
            )?;
            success(format!("Template {} ({}) added: {}", tpl.id, tpl.label, describe(&tpl)));
        }

        SessionCmd::EditTemplate { id, start, end } => {
            let mut templates = ws.templates()?;
            let tpl = sessions::set_template_time(
                &mut templates,
                id,
                parse_optional_time(start.as_ref())?,
                parse_optional_time(end.as_ref())?,
            )?;
            ws.save(keys::SESSION_TEMPLATES, &templates)?;
            ttlog(&pool.conn, "session_template_edit", &tpl.id, &describe(&tpl))?;
            success(format!("Template {} now runs {}", tpl.id, describe(&tpl)));
        }

        SessionCmd::Dates { dates, remove } => {
            let selected = expand_dates(dates).map_err(AppError::InvalidDate)?;
            let mut stored: Vec<NaiveDate> = ws.load(keys::SESSION_DATES)?;

            if *remove {
                stored.retain(|d| !selected.contains(d));
            } else {
                stored.extend(selected.iter().copied());
                stored.sort();
                stored.dedup();
            }

            ws.save(keys::SESSION_DATES, &stored)?;
            let verb = if *remove { "removed" } else { "selected" };
            ttlog(
                &pool.conn,
                "session_dates_edit",
                &ctx.project,
                &format!("{} date(s) {}", selected.len(), verb),
            )?;
            success(format!(
                "{} date(s) {}; {} exam date(s) in {}.",
                selected.len(),
                verb,
                stored.len(),
                ctx.project
            ));
        }

        SessionCmd::Override {
            date,
            template,
            start,
            end,
            disable,
            enable,
        } => {
            let d = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
            let templates = ws.templates()?;
            let mut overrides: Vec<DateSessionOverride> = ws.load(keys::SESSION_OVERRIDES)?;

            let enabled = if *disable {
                Some(false)
            } else if *enable {
                Some(true)
            } else {
                None
            };

            let ov = sessions::override_session(
                &mut overrides,
                &templates,
                d,
                template,
                parse_optional_time(start.as_ref())?,
                parse_optional_time(end.as_ref())?,
                enabled,
            )?;
            ws.save(keys::SESSION_OVERRIDES, &overrides)?;

            let state = if ov.enabled {
                format!(
                    "{}–{}",
                    ov.start_time.format("%H:%M"),
                    ov.end_time.format("%H:%M")
                )
            } else {
                "disabled".to_string()
            };
            ttlog(
                &pool.conn,
                "session_override_edit",
                &format!("{}_{}", ov.date, ov.template_id),
                &state,
            )?;
            success(format!("{} on {}: {}", ov.template_id, ov.date, state));
        }

        SessionCmd::List { date } => {
            let filter = match date {
                Some(s) => Some(parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?),
                None => None,
            };

            let all = ws.sessions()?;
            let shown: Vec<_> = all
                .iter()
                .filter(|s| filter.is_none_or(|d| s.date == d))
                .collect();

            if shown.is_empty() {
                info(format!("No sessions in subproject {}.", ctx.project));
                return Ok(());
            }

            let mut t = Table::new(&["SESSION", "DATE", "LABEL", "TIME", "STATUS"]);
            for s in shown {
                let status = s.status(ctx.now);
                t.add_row(vec![
                    s.id.clone(),
                    s.date.to_string(),
                    s.label.clone(),
                    s.time_range(),
                    paint(color_for_status(status), status.as_str()),
                ]);
            }
            print!("{}", t.render());
        }
    }

    Ok(())
}

fn describe(tpl: &SessionTemplate) -> String {
    format!(
        "{}–{}",
        tpl.start_time.format("%H:%M"),
        tpl.end_time.format("%H:%M")
    )
}
