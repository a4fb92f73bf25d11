//! Scripted console for testing
//!
//! Uses queued answers instead of a real terminal and records everything
//! the runner writes.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use crate::console::Console;
use crate::option::AllowedValues;

#[derive(Debug, Default)]
struct Script {
    prompts: VecDeque<String>,
    confirms: VecDeque<bool>,
    choices: VecDeque<String>,
    asked: Vec<String>,
    errors: Vec<String>,
    tables: Vec<(Vec<String>, Vec<Vec<String>>)>,
    output: Vec<String>,
}

/// Fake console (replays fixture answers)
///
/// Running out of answers yields `UnexpectedEof`, the same error a closed
/// stdin produces on the real terminal.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    script: Mutex<Script>,
}

impl ScriptedConsole {
    /// Console with no queued answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers for `prompt`
    pub fn with_prompts<I, S>(self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().prompts.extend(answers.into_iter().map(Into::into));
        self
    }

    /// Queue answers for `confirm`
    pub fn with_confirms<I: IntoIterator<Item = bool>>(self, answers: I) -> Self {
        self.lock().confirms.extend(answers);
        self
    }

    /// Queue answers for `choice`
    pub fn with_choices<I, S>(self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().choices.extend(answers.into_iter().map(Into::into));
        self
    }

    /// Texts of every prompt/confirm/choice asked, in order
    pub fn asked(&self) -> Vec<String> {
        self.lock().asked.clone()
    }

    /// Every error reported
    pub fn errors(&self) -> Vec<String> {
        self.lock().errors.clone()
    }

    /// Every table rendered, as `(headers, rows)`
    pub fn tables(&self) -> Vec<(Vec<String>, Vec<Vec<String>>)> {
        self.lock().tables.clone()
    }

    /// Every plain output line
    pub fn output(&self) -> Vec<String> {
        self.lock().output.clone()
    }

    /// Answers not consumed yet: `(prompts, confirms, choices)`
    pub fn remaining(&self) -> (usize, usize, usize) {
        let script = self.lock();
        (script.prompts.len(), script.confirms.len(), script.choices.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A panicking test thread must not hide the recorded calls
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn exhausted(kind: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("no scripted {} answer left", kind),
    )
}

impl Console for ScriptedConsole {
    fn prompt(&self, text: &str) -> io::Result<String> {
        let mut script = self.lock();
        script.asked.push(text.to_string());
        script.prompts.pop_front().ok_or_else(|| exhausted("prompt"))
    }

    fn confirm(&self, text: &str, default: bool) -> io::Result<bool> {
        let mut script = self.lock();
        script.asked.push(text.to_string());
        match script.confirms.pop_front() {
            Some(answer) => Ok(answer),
            // An empty prompt queue entry acts as a blank line
            None => match script.prompts.pop_front() {
                Some(line) if line.trim().is_empty() => Ok(default),
                Some(line) => Ok(matches!(line.trim(), "y" | "yes" | "Y")),
                None => Err(exhausted("confirm")),
            },
        }
    }

    fn choice(&self, text: &str, options: &AllowedValues, default: Option<&str>) -> io::Result<String> {
        let mut script = self.lock();
        script.asked.push(text.to_string());
        match script.choices.pop_front() {
            Some(answer) if answer.is_empty() => default
                .map(str::to_string)
                .ok_or_else(|| exhausted("choice")),
            Some(answer) => Ok(answer),
            None => match default {
                Some(default) if !options.is_empty() => Ok(default.to_string()),
                _ => Err(exhausted("choice")),
            },
        }
    }

    fn error(&self, text: &str) {
        self.lock().errors.push(text.to_string());
    }

    fn table(&self, rows: &[Vec<String>], headers: &[&str]) {
        self.lock().tables.push((
            headers.iter().map(|h| h.to_string()).collect(),
            rows.to_vec(),
        ));
    }

    fn write_line(&self, text: &str) {
        self.lock().output.push(text.to_string());
    }
}
