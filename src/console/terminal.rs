//! Stdin/stdout console
//!
//! Prompts are written to stdout and answers read line by line from stdin.
//! End of input is reported as `UnexpectedEof` so a closed stdin cannot spin
//! a retry loop forever.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use crossterm::tty::IsTty;

use crate::console::{render_table, Color, Console};
use crate::option::AllowedValues;

/// Interactive terminal console
#[derive(Debug, Clone)]
pub struct Terminal {
    colored: bool,
}

impl Terminal {
    /// Colors are enabled when stdout is a terminal
    pub fn new() -> Self {
        Self {
            colored: io::stdout().is_tty(),
        }
    }

    /// Force colors on or off
    pub fn with_colors(colored: bool) -> Self {
        Self { colored }
    }

    fn read_line(&self, text: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{} ", text)?;
        stdout.flush()?;
        drop(stdout);

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Terminal {
    fn prompt(&self, text: &str) -> io::Result<String> {
        self.read_line(text)
    }

    fn confirm(&self, text: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.read_line(&format!("{} {}", text, hint))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.error("Please answer y or n"),
            }
        }
    }

    fn choice(&self, text: &str, options: &AllowedValues, default: Option<&str>) -> io::Result<String> {
        self.write_line(text);
        for (key, label) in options.entries() {
            if key == label {
                self.write_line(&format!("  [{}]", key));
            } else {
                self.write_line(&format!("  [{}] {}", key, label));
            }
        }

        let question = match default {
            Some(default) => format!("Choice ({})", default),
            None => "Choice".to_string(),
        };

        loop {
            let answer = self.read_line(&question)?;
            let answer = answer.trim();
            if answer.is_empty() {
                if let Some(default) = default {
                    return Ok(default.to_string());
                }
            } else if options.contains(answer) {
                return Ok(answer.to_string());
            }
            self.error(&format!("Please choose one of: {}", options.keys().join(", ")));
        }
    }

    fn error(&self, text: &str) {
        let line = self.style(text, Color::Red);
        eprintln!("{}", line);
    }

    fn table(&self, rows: &[Vec<String>], headers: &[&str]) {
        println!("{}", render_table(rows, headers));
    }

    fn write_line(&self, text: &str) {
        println!("{}", text);
    }

    fn style(&self, text: &str, color: Color) -> String {
        if !self.colored {
            return text.to_string();
        }
        let styled = match color {
            Color::Green => text.green(),
            Color::Red => text.red(),
            Color::Yellow => text.yellow(),
            Color::Cyan => text.cyan(),
        };
        styled.to_string()
    }
}
