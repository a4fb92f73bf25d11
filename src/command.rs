//! Command capability contract and descriptors
//!
//! A command type provides two things:
//! - `CommandType::definition()`: static metadata (alias, name, description,
//!   options), read by discovery without constructing anything
//! - `Command::run`: the entry point, called once per invocation on a
//!   freshly built instance

use std::collections::BTreeMap;

use serde::Serialize;

use crate::console::Console;
use crate::inflector;
use crate::option::OptionSchema;
use crate::value::{FromValue, Value};
use crate::ExitCode;

/// Type-name suffix stripped when deriving default aliases and names
pub const COMMAND_SUFFIX: &str = "Command";

/// Separator between sub-namespace prefix and alias for nested commands
pub const ALIAS_SEPARATOR: &str = ".";

/// Result of a command body: `None` means success
pub type CommandResult = anyhow::Result<Option<ExitCode>>;

/// An invocable command instance
pub trait Command: Send {
    fn run(&mut self, input: &Input<'_>) -> CommandResult;
}

/// A command type that can be registered in the catalog
pub trait CommandType: Command + Sized + 'static {
    /// Short type name, e.g. `ArgumentsCommand`
    const TYPE_NAME: &'static str;

    /// Static metadata; must not have side effects
    fn definition() -> CommandDefinition;

    /// Construct a fresh instance for one invocation
    fn build() -> Self;
}

/// Declared metadata of a command type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandDefinition {
    /// Explicit alias override
    pub alias: Option<String>,
    /// Explicit display name override
    pub name: Option<String>,
    pub description: String,
    pub options: OptionSchema,
}

impl CommandDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn options(mut self, options: OptionSchema) -> Self {
        self.options = options;
        self
    }
}

/// Strip the `Command` suffix from a type name (`ArgumentsCommand` → `Arguments`)
pub fn short_name(type_name: &str) -> &str {
    match type_name.strip_suffix(COMMAND_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => type_name,
    }
}

/// Discovered, immutable metadata for one command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDescriptor {
    /// Lookup key typed on the command line
    pub alias: String,
    /// Human-readable name
    pub name: String,
    pub description: String,
    pub options: OptionSchema,
    /// Fully-qualified type reference understood by the container
    pub type_ref: String,
}

impl CommandDescriptor {
    /// Build a descriptor from a type's definition.
    ///
    /// `prefix` holds the sub-directory segments the type was found under;
    /// they become a dotted alias prefix unless the alias is overridden.
    pub fn from_definition(
        type_ref: impl Into<String>,
        type_name: &str,
        prefix: &[String],
        definition: CommandDefinition,
    ) -> Self {
        let short = short_name(type_name);

        let alias = match definition.alias.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => alias.to_lowercase(),
            _ => {
                let mut parts: Vec<String> = prefix.iter().map(|p| inflector::underscore(p)).collect();
                parts.push(inflector::underscore(short));
                parts.join(ALIAS_SEPARATOR)
            }
        };

        let name = match definition.name {
            Some(name) if !name.is_empty() => name,
            _ => short.to_string(),
        };

        Self {
            alias,
            name,
            description: definition.description,
            options: definition.options,
            type_ref: type_ref.into(),
        }
    }

    /// Option keys in declaration order, comma separated
    pub fn option_list(&self) -> String {
        self.options.keys().join(", ")
    }
}

/// Resolved option values, keyed by option key
pub type ResolvedOptions = BTreeMap<String, Value>;

/// What a command receives when it runs
pub struct Input<'a> {
    alias: &'a str,
    options: &'a ResolvedOptions,
    console: &'a dyn Console,
}

impl<'a> Input<'a> {
    pub fn new(alias: &'a str, options: &'a ResolvedOptions, console: &'a dyn Console) -> Self {
        Self {
            alias,
            options,
            console,
        }
    }

    /// Alias the command was invoked under
    pub fn alias(&self) -> &str {
        self.alias
    }

    /// Raw resolved value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Typed value for `key`
    pub fn value<T: FromValue>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(T::from_value)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn options(&self) -> &ResolvedOptions {
        self.options
    }

    pub fn console(&self) -> &dyn Console {
        self.console
    }
}
