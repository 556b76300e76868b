use crate::db::log::load_log;
use crate::db::store::RecordStore;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI colour for an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "seed" => Colour::Green,
        "seed_skipped" => Colour::Yellow,
        "turn_failed" => Colour::Red,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(store: &RecordStore) -> AppResult<()> {
        let entries = load_log(&store.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for entry in entries {
            let date = chrono::DateTime::parse_from_rfc3339(&entry.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| entry.date.clone());

            let mut op_target = color_for_operation(&entry.operation)
                .paint(entry.operation.as_str())
                .to_string();
            if !entry.target.is_empty() {
                op_target.push_str(&format!(" ({})", entry.target));
            }

            // pad on the visible width, colour codes excluded
            let visible = strip_ansi(&ansi, &op_target).chars().count();
            let padding = " ".repeat(40usize.saturating_sub(visible));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id,
                date,
                op_target,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
