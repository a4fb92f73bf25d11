//! Argument resolver
//!
//! Binds tokenizer output to a command's option schema. Each option, in
//! declaration order, moves through:
//!
//! ```text
//! UNRESOLVED → CANDIDATE → VALIDATED → RESOLVED
//!                  ↑            │
//!                  └─ PROMPT ───┘   (required option, no valid value yet)
//! ```
//!
//! Candidate: the named value for the key if given, else the next positional
//! value, else nothing. Validation depends on the option's shape
//! (enumerated, boolean, scalar). Invalid input is reported through
//! `Console::error` and then treated as absent, so required options fall
//! through to prompting and optional ones to their default. Only console
//! I/O failures abort resolution.

use tracing::debug;

use crate::command::{CommandDescriptor, ResolvedOptions};
use crate::console::Console;
use crate::error::Result;
use crate::option::{AllowedValues, OptionSpec};
use crate::tokenizer::ArgumentBundle;
use crate::types::{TypeParser, ValueType};
use crate::value::Value;

/// Strings that make a boolean option false. Matched case-sensitively.
pub const FALSE_STRINGS: [&str; 3] = ["false", "n", "no"];

/// Per-option resolution state
#[derive(Debug, Clone, PartialEq)]
pub enum OptionState {
    Unresolved,
    Candidate(Option<Value>),
    Validated(Option<Value>),
    PromptRetry,
    Resolved(Option<Value>),
}

/// Coerce a supplied boolean-option value
pub fn truthy_flag(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        Value::String(s) => !FALSE_STRINGS.contains(&s.as_str()),
        other => other.is_truthy(),
    }
}

/// Argument resolver
pub struct Resolver<'a> {
    types: &'a TypeParser,
    console: &'a dyn Console,
}

impl<'a> Resolver<'a> {
    pub fn new(types: &'a TypeParser, console: &'a dyn Console) -> Self {
        Self { types, console }
    }

    /// Resolve every declared option of `descriptor` against `bundle`.
    ///
    /// Options resolving to nothing are left out of the result.
    pub fn resolve(&self, descriptor: &CommandDescriptor, mut bundle: ArgumentBundle) -> Result<ResolvedOptions> {
        let mut resolved = ResolvedOptions::new();

        for (key, spec) in descriptor.options.iter() {
            let candidate = match bundle.take_named(key) {
                Some(raw) => Some(raw.to_value()),
                None => bundle.shift().map(Value::String),
            };

            if let Some(value) = self.resolve_option(key, spec, candidate)? {
                resolved.insert(key.to_string(), value);
            }
        }

        for key in bundle.named().keys() {
            debug!("resolver: {} ignores undeclared option '{}'", descriptor.alias, key);
        }

        Ok(resolved)
    }

    /// Run one option through its state machine
    pub fn resolve_option(&self, key: &str, spec: &OptionSpec, candidate: Option<Value>) -> Result<Option<Value>> {
        let value_type = self.types.use_type(&spec.logical_type);
        let mut pending = candidate;
        let mut state = OptionState::Unresolved;

        loop {
            debug!("resolver: option '{}' {:?}", key, state);
            state = match state {
                OptionState::Unresolved => OptionState::Candidate(pending.take()),
                OptionState::Candidate(candidate) => OptionState::Validated(self.validate(key, spec, value_type.as_ref(), candidate)),
                OptionState::Validated(Some(value)) => OptionState::Resolved(Some(value)),
                OptionState::Validated(None) if spec.required => OptionState::PromptRetry,
                OptionState::Validated(None) => OptionState::Resolved(self.fallback(spec, value_type.as_ref())),
                OptionState::PromptRetry => OptionState::Validated(self.ask(key, spec, value_type.as_ref())?),
                OptionState::Resolved(value) => return Ok(value),
            };
        }
    }

    /// Check a candidate against the option's shape.
    ///
    /// Boolean options always validate to a value; the other shapes yield
    /// `None` for absent or invalid candidates.
    fn validate(&self, key: &str, spec: &OptionSpec, value_type: &dyn ValueType, candidate: Option<Value>) -> Option<Value> {
        if let Some(allowed) = &spec.allowed_values {
            let candidate = candidate?;
            if !allowed.contains_value(&candidate) {
                self.console.error(&format!("Invalid option value for: {}", key));
                return None;
            }
            return value_type.parse(&candidate);
        }

        if spec.is_boolean() {
            return match candidate {
                Some(value) => Some(Value::Boolean(truthy_flag(&value))),
                // Absent booleans are settled by `fallback` / `ask`
                None => None,
            };
        }

        match candidate {
            None => None,
            Some(Value::Boolean(_)) => {
                self.console.error(&format!("Invalid value for: {}", key));
                None
            }
            Some(raw) => {
                let parsed = value_type.parse(&raw);
                if parsed.is_none() {
                    debug!("resolver: option '{}' rejected {} value '{}'", key, raw.kind(), raw);
                    self.console.error(&format!("Invalid value for: {}", key));
                }
                parsed
            }
        }
    }

    /// Value for an optional option that received nothing usable
    fn fallback(&self, spec: &OptionSpec, value_type: &dyn ValueType) -> Option<Value> {
        if spec.is_boolean() && !spec.is_enumerated() {
            let default = spec.default_value.as_ref().map_or(false, Value::is_truthy);
            return Some(Value::Boolean(default));
        }
        spec.default_value.as_ref().and_then(|default| value_type.parse(default))
    }

    /// One interactive attempt for a required option
    fn ask(&self, key: &str, spec: &OptionSpec, value_type: &dyn ValueType) -> Result<Option<Value>> {
        if let Some(allowed) = &spec.allowed_values {
            return self.ask_choice(key, spec, allowed, value_type);
        }

        if spec.is_boolean() {
            let default = spec.default_value.as_ref().map_or(true, Value::is_truthy);
            let answer = self.console.confirm(&spec.prompt, default)?;
            return Ok(Some(Value::Boolean(answer)));
        }

        let default = spec.default_value.as_ref();
        let text = match default.filter(|d| d.is_truthy()) {
            Some(default) => format!("{} ({})", spec.prompt, default),
            None => spec.prompt.clone(),
        };

        let line = self.console.prompt(&text)?;
        if line.trim().is_empty() {
            return Ok(default.and_then(|d| value_type.parse(d)));
        }

        let parsed = value_type.parse(&Value::String(line));
        if parsed.is_none() {
            self.console.error(&format!("Invalid value for: {}", key));
        }
        Ok(parsed)
    }

    fn ask_choice(
        &self,
        key: &str,
        spec: &OptionSpec,
        allowed: &AllowedValues,
        value_type: &dyn ValueType,
    ) -> Result<Option<Value>> {
        let default = spec.default_value.as_ref().map(Value::to_string);
        let chosen = self.console.choice(&spec.prompt, allowed, default.as_deref())?;

        if !allowed.contains(&chosen) {
            self.console.error(&format!("Invalid option value for: {}", key));
            return Ok(None);
        }
        Ok(value_type.parse(&Value::String(chosen)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandDefinition, CommandDescriptor};
    use crate::console::ScriptedConsole;
    use crate::option::{OptionSchema, OptionSpec};

    fn descriptor(options: OptionSchema) -> CommandDescriptor {
        CommandDescriptor::from_definition(
            "tests::SampleCommand",
            "SampleCommand",
            &[],
            CommandDefinition::new().options(options),
        )
    }

    fn resolve(options: OptionSchema, bundle: ArgumentBundle, console: &ScriptedConsole) -> ResolvedOptions {
        let types = TypeParser::new();
        Resolver::new(&types, console)
            .resolve(&descriptor(options), bundle)
            .unwrap()
    }

    #[test]
    fn test_truthy_flag_policy() {
        for falsy in ["false", "n", "no"] {
            assert!(!truthy_flag(&Value::from(falsy)), "{} should be false", falsy);
        }
        for truthy in ["y", "yes", "1", "true", "0", "NO", "False", ""] {
            assert!(truthy_flag(&Value::from(truthy)), "{:?} should be true", truthy);
        }
        assert!(truthy_flag(&Value::Boolean(true)));
    }

    #[test]
    fn test_resolve_option_uses_supplied_candidate() {
        let console = ScriptedConsole::new().with_prompts(["7"]);
        let types = TypeParser::new();
        let resolver = Resolver::new(&types, &console);
        let spec = OptionSpec::new("Count").of_type("integer").required();

        let supplied = resolver.resolve_option("count", &spec, Some(Value::from("4"))).unwrap();
        assert_eq!(supplied, Some(Value::Integer(4)));
        assert!(console.asked().is_empty());

        let prompted = resolver.resolve_option("count", &spec, None).unwrap();
        assert_eq!(prompted, Some(Value::Integer(7)));
        assert_eq!(console.remaining(), (0, 0, 0));
    }

    #[test]
    fn test_named_before_positional() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new()
            .option("first", OptionSpec::new("First"))
            .option("second", OptionSpec::new("Second"));
        let bundle = ArgumentBundle::positional(["p1"]).with("second", "named");

        let resolved = resolve(options, bundle, &console);
        assert_eq!(resolved.get("first"), Some(&Value::from("p1")));
        assert_eq!(resolved.get("second"), Some(&Value::from("named")));
    }

    #[test]
    fn test_optional_without_default_is_omitted() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option("value", OptionSpec::new("Value"));
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_optional_default_is_converted() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option(
            "count",
            OptionSpec::new("Count").of_type("integer").with_default("3"),
        );
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert_eq!(resolved.get("count"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_enum_invalid_reports_and_chooses_default() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option(
            "value",
            OptionSpec::new("Which do you want?")
                .with_values(["a", "b", "c"])
                .required()
                .with_default("a"),
        );

        let resolved = resolve(options, ArgumentBundle::positional(["d"]), &console);
        assert_eq!(resolved.get("value"), Some(&Value::from("a")));
        assert_eq!(console.errors(), vec!["Invalid option value for: value"]);
        assert_eq!(console.asked(), vec!["Which do you want?"]);
    }

    #[test]
    fn test_enum_valid_value_passes() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option(
            "value",
            OptionSpec::new("Which?").with_values(["a", "b", "c"]).required().with_default("a"),
        );
        let resolved = resolve(options, ArgumentBundle::positional(["b"]), &console);
        assert_eq!(resolved.get("value"), Some(&Value::from("b")));
        assert!(console.errors().is_empty());
        assert!(console.asked().is_empty());
    }

    #[test]
    fn test_enum_choice_retries_until_member() {
        let console = ScriptedConsole::new().with_choices(["zzz", "c"]);
        let options = OptionSchema::new().option(
            "value",
            OptionSpec::new("Which?").with_values(["a", "b", "c"]).required(),
        );
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert_eq!(resolved.get("value"), Some(&Value::from("c")));
        assert_eq!(console.asked().len(), 2);
        assert_eq!(console.errors().len(), 1);
    }

    #[test]
    fn test_enum_optional_falls_back_to_default() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option(
            "format",
            OptionSpec::new("Format")
                .with_keyed_values([("plain", "Plain text"), ("json", "JSON")])
                .with_default("plain"),
        );
        let resolved = resolve(options, ArgumentBundle::positional(["xml"]), &console);
        assert_eq!(resolved.get("format"), Some(&Value::from("plain")));
        assert_eq!(console.errors().len(), 1);
    }

    #[test]
    fn test_boolean_presence_flag() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option("test", OptionSpec::boolean("Do you agree?").required());
        let bundle = ArgumentBundle::new().with("test", true);
        let resolved = resolve(options, bundle, &console);
        assert_eq!(resolved.get("test"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_boolean_required_missing_confirms() {
        let console = ScriptedConsole::new().with_confirms([false]);
        let options = OptionSchema::new().option("test", OptionSpec::boolean("Do you agree?").required());
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert_eq!(resolved.get("test"), Some(&Value::Boolean(false)));
        assert_eq!(console.asked(), vec!["Do you agree?"]);
    }

    #[test]
    fn test_boolean_required_blank_confirm_defaults_true() {
        let console = ScriptedConsole::new().with_prompts([""]);
        let options = OptionSchema::new().option("test", OptionSpec::boolean("Agree?").required());
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert_eq!(resolved.get("test"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_boolean_optional_uses_default() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new()
            .option("quiet", OptionSpec::boolean("Quiet?"))
            .option("loud", OptionSpec::boolean("Loud?").with_default(true));
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert_eq!(resolved.get("quiet"), Some(&Value::Boolean(false)));
        assert_eq!(resolved.get("loud"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_presence_flag_on_scalar_is_reported() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option("name", OptionSpec::new("Name").with_default("world"));
        let bundle = ArgumentBundle::new().with("name", true);
        let resolved = resolve(options, bundle, &console);
        assert_eq!(resolved.get("name"), Some(&Value::from("world")));
        assert_eq!(console.errors(), vec!["Invalid value for: name"]);
    }

    #[test]
    fn test_scalar_prompt_blank_uses_default() {
        let console = ScriptedConsole::new().with_prompts([""]);
        let options = OptionSchema::new().option(
            "value",
            OptionSpec::new("Please enter a value").required().with_default("value"),
        );
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert_eq!(resolved.get("value"), Some(&Value::from("value")));
        assert_eq!(console.asked(), vec!["Please enter a value (value)"]);
    }

    #[test]
    fn test_scalar_prompt_retries_until_valid() {
        let console = ScriptedConsole::new().with_prompts(["", "abc", "12"]);
        let options = OptionSchema::new().option(
            "count",
            OptionSpec::new("How many?").of_type("integer").required(),
        );
        let resolved = resolve(options, ArgumentBundle::new(), &console);
        assert_eq!(resolved.get("count"), Some(&Value::Integer(12)));
        assert_eq!(console.asked().len(), 3);
        assert_eq!(console.errors(), vec!["Invalid value for: count"]);
    }

    #[test]
    fn test_prompt_eof_is_an_error() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option("value", OptionSpec::new("Value").required());
        let types = TypeParser::new();
        let result = Resolver::new(&types, &console).resolve(&descriptor(options), ArgumentBundle::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_supplied_integer_falls_back() {
        let console = ScriptedConsole::new();
        let options = OptionSchema::new().option(
            "count",
            OptionSpec::new("Count").of_type("integer").with_default(5i64),
        );
        let resolved = resolve(options, ArgumentBundle::positional(["many"]), &console);
        assert_eq!(resolved.get("count"), Some(&Value::Integer(5)));
        assert_eq!(console.errors().len(), 1);
    }
}
