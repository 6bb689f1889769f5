use crate::cli::AppContext;
use crate::cli::parser::ChecklistCmd;
use crate::core::checklist::{parse_fields, state, submit};
use crate::core::sessions::find_session;
use crate::core::workspace::Workspace;
use crate::db::log::ttlog;
use crate::db::store::keys;
use crate::errors::AppResult;
use crate::models::checklist::{ChecklistState, ChecklistSubmission, ChecklistType};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, GREY, RED, YELLOW, paint};
use crate::utils::table::Table;

fn color_for_state(s: &ChecklistState) -> &'static str {
    match s {
        ChecklistState::NotYetOpen { .. } => YELLOW,
        ChecklistState::Open { .. } => GREEN,
        ChecklistState::Closed { .. } => RED,
        ChecklistState::Submitted { .. } => GREY,
    }
}

pub fn handle(cmd: &ChecklistCmd, ctx: &AppContext) -> AppResult<()> {
    let pool = ctx.open()?;
    let ws = Workspace::new(&pool.conn, &ctx.project);
    let sessions = ws.sessions()?;
    let mut submissions: Vec<ChecklistSubmission> = ws.load(keys::CHECKLISTS)?;

    match cmd {
        ChecklistCmd::Status { session } => {
            let shown = match session {
                Some(id) => vec![find_session(&sessions, id)?],
                None => sessions.iter().collect(),
            };

            if shown.is_empty() {
                info(format!("No sessions in subproject {}.", ctx.project));
                return Ok(());
            }

            let mut t = Table::new(&["SESSION", "TIME", "CHECKLIST", "STATE"]);
            for s in shown {
                for ty in ChecklistType::ALL {
                    let st = state(s, ty, &ctx.cfg, &submissions, ctx.now);
                    t.add_row(vec![
                        s.id.clone(),
                        s.time_range(),
                        ty.label().to_string(),
                        paint(color_for_state(&st), &st.describe()),
                    ]);
                }
            }
            print!("{}", t.render());
        }

        ChecklistCmd::Submit {
            session,
            checklist,
            fields,
        } => {
            let s = find_session(&sessions, session)?;
            let fields = parse_fields(fields)?;

            let sub = submit(
                &mut submissions,
                s,
                *checklist,
                &ctx.cfg,
                fields,
                ctx.operator(),
                ctx.now,
            )?;
            ws.save(keys::CHECKLISTS, &submissions)?;
            ttlog(
                &pool.conn,
                "checklist_submit",
                &sub.session_id,
                &format!("{} with {} field(s)", checklist.label(), sub.fields.len()),
            )?;
            success(format!(
                "{} submitted for {} at {}",
                checklist.label(),
                sub.session_id,
                sub.actual_submit_time.format("%Y-%m-%d %H:%M")
            ));
        }
    }

    Ok(())
}
