use crate::db::log::{AuditEntry, load_entries};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const OP_TARGET_MAX: usize = 60;

static ANSI_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI_RE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// Colour of an operation in the audit listing.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" | "resume" | "login" | "start-day" => Colour::Green,
        "hold" => Colour::Yellow,
        "complete" | "as-built" => Colour::Cyan,
        "pre-jsa" | "post-jsa" => Colour::Blue,
        "incident" => Colour::Red,
        "logout" | "end-day" => Colour::RGB(255, 153, 51),
        "offline" | "sync" => Colour::Fixed(245),
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        _ => Colour::White,
    }
}

fn op_target(entry: &AuditEntry) -> String {
    if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    }
}

/// Cut to `OP_TARGET_MAX` visible chars and colour only the operation word.
fn render_op_target(entry: &AuditEntry) -> String {
    let visible = op_target(entry);
    let visible = if visible.chars().count() > OP_TARGET_MAX {
        let mut s: String = visible.chars().take(OP_TARGET_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    let color = color_for_operation(&entry.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_entries(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let dates: Vec<String> = entries
            .iter()
            .map(|e| {
                chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone())
            })
            .collect();

        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_TARGET_MAX);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = dates.iter().map(|d| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (entry, date) in entries.iter().zip(&dates) {
            let rendered = render_op_target(entry);
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&rendered).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id, date, rendered, padding, entry.message,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(op: &str, target: &str) -> AuditEntry {
        AuditEntry {
            id: 1,
            date: String::new(),
            operation: op.to_string(),
            target: target.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(100);
        let rendered = render_op_target(&entry("hold", &long));
        let visible = strip_ansi(&rendered);
        assert_eq!(visible.chars().count(), OP_TARGET_MAX);
        assert!(visible.ends_with("..."));
        assert!(visible.starts_with("hold ("));
    }
}
