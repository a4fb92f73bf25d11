//! Console I/O
//!
//! Everything the runner shows to or asks from the user goes through the
//! `Console` trait:
//! - `prompt` / `confirm` / `choice`: blocking interactive reads
//! - `error`: the single channel for user-facing errors
//! - `table`: command listing
//!
//! `Terminal` talks to stdin/stdout; `ScriptedConsole` replays queued
//! answers for tests.

pub mod scripted;
pub mod terminal;

pub use scripted::ScriptedConsole;
pub use terminal::Terminal;

use std::io;
use std::sync::OnceLock;

use regex::Regex;

use crate::option::AllowedValues;

/// Foreground colors used for styled output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
    Yellow,
    Cyan,
}

/// Console I/O collaborator
pub trait Console: Send + Sync {
    /// Ask for a line of input. Blocks until a line is available.
    fn prompt(&self, text: &str) -> io::Result<String>;

    /// Ask a yes/no question; a blank answer yields `default`
    fn confirm(&self, text: &str, default: bool) -> io::Result<bool>;

    /// Ask the user to pick one of `options`, returning its key
    fn choice(&self, text: &str, options: &AllowedValues, default: Option<&str>) -> io::Result<String>;

    /// Report a user-facing error
    fn error(&self, text: &str);

    /// Render rows under headers
    fn table(&self, rows: &[Vec<String>], headers: &[&str]);

    /// Plain output line
    fn write_line(&self, text: &str);

    /// Apply a color, if the console supports it
    fn style(&self, text: &str, _color: Color) -> String {
        text.to_string()
    }
}

fn ansi_escape() -> &'static Regex {
    static ANSI_ESCAPE: OnceLock<Regex> = OnceLock::new();
    ANSI_ESCAPE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("ANSI escape pattern is valid"))
}

/// Printable width of a cell, ignoring ANSI escape sequences
pub fn visible_width(text: &str) -> usize {
    ansi_escape().replace_all(text, "").chars().count()
}

/// Render a bordered text table
pub fn render_table(rows: &[Vec<String>], headers: &[&str]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; columns];
    for (i, header) in headers.iter().enumerate() {
        widths[i] = widths[i].max(visible_width(header));
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let render_row = |cells: &[String]| -> String {
        let rendered: Vec<String> = (0..columns)
            .map(|i| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = widths[i] - visible_width(cell);
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        format!("|{}|", rendered.join("|"))
    };

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(border.clone());
    if !headers.is_empty() {
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        out.push(render_row(&header_cells));
        out.push(border.clone());
    }
    for row in rows {
        out.push(render_row(row));
    }
    out.push(border);
    out.join("\n")
}
