//! Shared fixtures for integration tests
//!
//! Mirrors a small command tree on disk:
//!
//! ```text
//! <tmp>/mock/
//!   arguments.rs                 not a candidate (no suffix)
//!   arguments_command.rs         ArgumentsCommand
//!   base_command.rs              BaseCommand (abstract)
//!   bool_options_command.rs      BoolOptionsCommand
//!   options_command.rs           OptionsCommand
//!   test_command.rs              TestCommand (alias "tester")
//!   type_options_command.rs      TypeOptionsCommand
//!   unregistered_command.rs      not in the catalog
//!   nested/deep_command.rs       nested::DeepCommand
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tempfile::TempDir;

use commandeer::{
    Catalog, Command, CommandDefinition, CommandEvent, CommandListener, CommandResult, CommandRunner,
    CommandType, Input, OptionSchema, OptionSpec, PathMap, ScriptedConsole, CODE_ERROR,
};

pub const MOCK_NAMESPACE: &str = "tests::mock";

pub const MOCK_FILES: &[&str] = &[
    "arguments.rs",
    "arguments_command.rs",
    "base_command.rs",
    "bool_options_command.rs",
    "options_command.rs",
    "test_command.rs",
    "type_options_command.rs",
    "unregistered_command.rs",
    "nested/deep_command.rs",
];

fn outcome(ok: bool) -> CommandResult {
    Ok(if ok { None } else { Some(CODE_ERROR) })
}

// ============================================================================
// Fixture commands
// ============================================================================

/// Succeeds only when `value` resolves to "value"
pub struct ArgumentsCommand;

impl Command for ArgumentsCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        outcome(input.get_str("value") == Some("value"))
    }
}

impl CommandType for ArgumentsCommand {
    const TYPE_NAME: &'static str = "ArgumentsCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new().options(OptionSchema::new().option(
            "value",
            OptionSpec::new("Please enter a value").required().with_default("value"),
        ))
    }

    fn build() -> Self {
        ArgumentsCommand
    }
}

/// Succeeds only when `test` resolves to true
pub struct BoolOptionsCommand;

impl Command for BoolOptionsCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        outcome(input.get_bool("test") == Some(true))
    }
}

impl CommandType for BoolOptionsCommand {
    const TYPE_NAME: &'static str = "BoolOptionsCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new().options(
            OptionSchema::new().option("test", OptionSpec::boolean("Do you agree?").required()),
        )
    }

    fn build() -> Self {
        BoolOptionsCommand
    }
}

/// Succeeds only when `value` resolves to "a"
pub struct OptionsCommand;

impl Command for OptionsCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        outcome(input.get_str("value") == Some("a"))
    }
}

impl CommandType for OptionsCommand {
    const TYPE_NAME: &'static str = "OptionsCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new().options(
            OptionSchema::new().option(
                "value",
                OptionSpec::new("Which do you want?")
                    .with_values(["a", "b", "c"])
                    .required()
                    .with_default("a"),
            ),
        )
    }

    fn build() -> Self {
        OptionsCommand
    }
}

pub struct TestCommand;

impl Command for TestCommand {
    fn run(&mut self, _input: &Input<'_>) -> CommandResult {
        Ok(None)
    }
}

impl CommandType for TestCommand {
    const TYPE_NAME: &'static str = "TestCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new()
            .alias("tester")
            .name("Test Command")
            .description("This is a test command.")
    }

    fn build() -> Self {
        TestCommand
    }
}

/// Succeeds only when `value` resolves to a date
pub struct TypeOptionsCommand;

impl Command for TypeOptionsCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        outcome(input.value::<NaiveDate>("value").is_some())
    }
}

impl CommandType for TypeOptionsCommand {
    const TYPE_NAME: &'static str = "TypeOptionsCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new().options(
            OptionSchema::new().option("value", OptionSpec::new("Which date?").of_type("date").required()),
        )
    }

    fn build() -> Self {
        TypeOptionsCommand
    }
}

/// Returns its `code` option as the exit code
pub struct DeepCommand;

impl Command for DeepCommand {
    fn run(&mut self, input: &Input<'_>) -> CommandResult {
        Ok(input.value::<i64>("code").map(|code| code as i32))
    }
}

impl CommandType for DeepCommand {
    const TYPE_NAME: &'static str = "DeepCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new()
            .description("Nested command")
            .options(OptionSchema::new().option("code", OptionSpec::new("Exit code").of_type("integer")))
    }

    fn build() -> Self {
        DeepCommand
    }
}

/// Fails from inside its body
pub struct BrokenCommand;

impl Command for BrokenCommand {
    fn run(&mut self, _input: &Input<'_>) -> CommandResult {
        anyhow::bail!("disk on fire")
    }
}

impl CommandType for BrokenCommand {
    const TYPE_NAME: &'static str = "BrokenCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new()
    }

    fn build() -> Self {
        BrokenCommand
    }
}

/// Panics from inside its body
pub struct PanickingCommand;

impl Command for PanickingCommand {
    fn run(&mut self, _input: &Input<'_>) -> CommandResult {
        panic!("fuse blown")
    }
}

impl CommandType for PanickingCommand {
    const TYPE_NAME: &'static str = "PanickingCommand";

    fn definition() -> CommandDefinition {
        CommandDefinition::new()
    }

    fn build() -> Self {
        PanickingCommand
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn mock_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .register::<ArgumentsCommand>(MOCK_NAMESPACE)
        .register::<BoolOptionsCommand>(MOCK_NAMESPACE)
        .register::<OptionsCommand>(MOCK_NAMESPACE)
        .register::<TestCommand>(MOCK_NAMESPACE)
        .register::<TypeOptionsCommand>(MOCK_NAMESPACE)
        .register::<DeepCommand>("tests::mock::nested")
        .register_abstract(MOCK_NAMESPACE, "BaseCommand", CommandDefinition::new);
    catalog
}

/// Create empty source files under `root`
pub fn write_files(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "// command source\n").unwrap();
    }
}

/// Temp dir holding `mock/` with every fixture file
pub fn mock_tree() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let mock = tmp.path().join("mock");
    write_files(&mock, MOCK_FILES);
    (tmp, mock)
}

/// Runner over the mock tree with `tests::mock` registered
pub fn mock_runner(console: Arc<ScriptedConsole>) -> (TempDir, CommandRunner) {
    let (tmp, mock) = mock_tree();
    let runner = CommandRunner::new(mock_catalog(), PathMap::new().with(MOCK_NAMESPACE, mock), console)
        .with_namespaces([MOCK_NAMESPACE]);
    (tmp, runner)
}

pub fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("commandeer")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Event recording
// ============================================================================

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl CommandListener for RecordingListener {
    fn on_event(&self, event: &CommandEvent<'_>) {
        let line = match event {
            CommandEvent::BuildCommands { commands } => format!("build:{}", commands.len()),
            CommandEvent::BeforeExecute { alias, options } => format!("before:{}:{}", alias, options.len()),
            CommandEvent::AfterExecute { alias, result, .. } => format!("after:{}:{}", alias, result),
        };
        self.events.lock().unwrap().push(line);
    }
}
