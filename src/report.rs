//! Human-readable summaries of scan and save results.
//!
//! Presentation is a trait with two implementations: [`RichPresenter`]
//! draws colored, aligned tables for terminals, [`PlainPresenter`] writes
//! one line per row for pipes and log captures. The scanning and versioning
//! code never depends on which one is active.

use crate::record::FileRecord;
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::Path;

/// Number of hash characters shown in summaries
pub const SHORT_HASH_LEN: usize = 8;

/// An ordered set of key/value cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.cells.push((key.into(), value.to_string()));
        self
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Row describing a created or would-be-created save
    pub fn target(path: &Path) -> Self {
        Self::new().cell("target", path.display())
    }
}

impl From<&FileRecord> for Row {
    fn from(record: &FileRecord) -> Self {
        Row::new()
            .cell("name", record.name())
            .cell("path", record.full_path.display())
            .cell("hash8", record.content_hash.short(SHORT_HASH_LEN))
            .cell("last_updated", record.last_modified_display())
    }
}

/// Renders summaries as text
pub trait Presenter {
    fn name(&self) -> &'static str;
    fn section(&self, title: &str) -> String;
    fn kv(&self, key: &str, value: &dyn Display) -> String;
    fn table(&self, title: &str, rows: &[Row]) -> String;
}

/// Pick the rich presenter for color-capable terminals, plain otherwise
pub fn create_presenter(force_plain: bool) -> Box<dyn Presenter> {
    let color_ok = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    if force_plain || !color_ok {
        Box::new(PlainPresenter)
    } else {
        Box::new(RichPresenter)
    }
}

/// Column names taken from the first row, like a header
fn columns(rows: &[Row]) -> Vec<&str> {
    rows.first()
        .map(|r| r.cells().iter().map(|(k, _)| k.as_str()).collect())
        .unwrap_or_default()
}

/// Line-per-row output with no escape codes
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPresenter;

impl Presenter for PlainPresenter {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn section(&self, title: &str) -> String {
        format!("\n{}\n{}\n", title, "-".repeat(60))
    }

    fn kv(&self, key: &str, value: &dyn Display) -> String {
        format!("{}: {}\n", key, value)
    }

    fn table(&self, title: &str, rows: &[Row]) -> String {
        if rows.is_empty() {
            return self.section(&format!("{} (empty)", title));
        }

        let mut output = self.section(title);
        for row in rows {
            let line = row
                .cells()
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" | ");
            output.push_str(&format!(" * {}\n", line));
        }
        output
    }
}

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Box-drawn tables with ANSI colors
#[derive(Debug, Clone, Copy, Default)]
pub struct RichPresenter;

impl RichPresenter {
    fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
        let inner = widths
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect::<Vec<_>>()
            .join(&mid.to_string());
        format!("{}{}{}\n", left, inner, right)
    }

    fn line(cells: &[&str], widths: &[usize], style: &str) -> String {
        let mut out = String::from("│");
        for (cell, width) in cells.iter().zip(widths) {
            let pad = width - cell.chars().count();
            out.push_str(&format!(" {}{}{}{} │", style, cell, RESET, " ".repeat(pad)));
        }
        out.push('\n');
        out
    }
}

impl Presenter for RichPresenter {
    fn name(&self) -> &'static str {
        "rich"
    }

    fn section(&self, title: &str) -> String {
        format!("\n{}{}{}\n{}\n", BOLD, title, RESET, "═".repeat(60))
    }

    fn kv(&self, key: &str, value: &dyn Display) -> String {
        format!("{}{}{}: {}\n", DIM, key, RESET, value)
    }

    fn table(&self, title: &str, rows: &[Row]) -> String {
        if rows.is_empty() {
            return self.section(&format!("{} (empty)", title));
        }

        let headers = columns(rows);
        let body: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| headers.iter().map(|h| row.get(h).unwrap_or("")).collect())
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = format!("\n{}{}{}\n", BOLD, title, RESET);
        output.push_str(&Self::border(&widths, '┌', '┬', '┐'));
        output.push_str(&Self::line(&headers, &widths, &format!("{}{}", BOLD, CYAN)));
        output.push_str(&Self::border(&widths, '├', '┼', '┤'));
        for cells in &body {
            output.push_str(&Self::line(cells, &widths, ""));
        }
        output.push_str(&Self::border(&widths, '└', '┴', '┘'));
        output
    }
}
