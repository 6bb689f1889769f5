use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::truncate;
use ansi_term::Colour;

const OP_WIDTH: usize = 48;

/// ANSI colour per operation family
fn color_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "backup" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        other if other.ends_with("_add") || other.ends_with("_map") || other == "attendance_mark" => {
            Colour::Green
        }
        other if other.ends_with("_del") || other.ends_with("_unmap") || other == "attendance_deallocate" => {
            Colour::Red
        }
        other if other.ends_with("_edit") || other.ends_with("_submit") || other.ends_with("_verify") => {
            Colour::Yellow
        }
        _ => Colour::White,
    }
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in &entries {
            let visible = truncate(&op_target(e), OP_WIDTH);
            let padding = " ".repeat(OP_WIDTH.saturating_sub(visible.chars().count()));

            // only the operation word is coloured
            let color = color_for_operation(&e.operation);
            let painted = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                painted,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
