//! Row view models and plain-terminal rendering of the queue.

use serde::Serialize;
use ts_rs::TS;

use triagem_core::models::patient::{PatientId, PatientRecord};
use triagem_core::severity::SeverityLevel;

use crate::messages;
use crate::notice::Notice;

/// One queue entry as the list screen shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct QueueRow {
    pub index: usize,
    pub id: Option<PatientId>,
    /// `"{name} ({age} anos)"`
    pub heading: String,
    /// `"Descrição: {description}"`
    pub description: String,
    /// `"Gravidade: {label}"`
    pub severity: String,
    pub severity_color: String,
    pub selected: bool,
}

impl QueueRow {
    pub fn new(index: usize, record: &PatientRecord, selected: bool) -> Self {
        let severity = SeverityLevel::from_level(record.severity);
        Self {
            index,
            id: record.id.clone(),
            heading: format!("{} ({} anos)", record.name, record.age),
            description: format!("Descrição: {}", record.description),
            severity: format!("Gravidade: {}", severity.label()),
            severity_color: severity.color().to_string(),
            selected,
        }
    }
}

/// Render rows for a terminal. Positions are 1-based; with `color` set the
/// severity line is painted with its classifier color.
pub fn render_queue(rows: &[QueueRow], color: bool) -> String {
    if rows.is_empty() {
        return format!("{}\n", messages::EMPTY_QUEUE);
    }

    let mut out = String::new();
    for row in rows {
        let marker = if row.selected { ">" } else { " " };
        out.push_str(&format!("{marker} {:>3}. {}\n", row.index + 1, row.heading));
        out.push_str(&format!("       {}\n", row.description));
        let severity = if color {
            paint(&row.severity, &row.severity_color)
        } else {
            row.severity.clone()
        };
        out.push_str(&format!("       {severity}\n"));
    }
    out
}

pub fn render_notice(notice: &Notice, color: bool) -> String {
    let text = match &notice.title {
        Some(title) => format!("{title}: {}", notice.text),
        None => notice.text.clone(),
    };
    if !color {
        return text;
    }
    paint(&text, notice.tone.color())
}

/// Wrap `text` in a 24-bit ANSI foreground color. Unparseable colors leave
/// the text unchanged.
fn paint(text: &str, hex: &str) -> String {
    match parse_hex_color(hex) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        None => text.to_string(),
    }
}

/// Parse `#RGB` or `#RRGGBB`.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|v| v * 17);
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}
