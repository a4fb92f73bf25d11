//! Argument tokenizer
//!
//! Grammar:
//! ```text
//! <program> <alias> [positional...] [--flag [value]]...
//! ```
//!
//! - `-x` / `--some-flag` opens a pending flag keyed `x` / `someFlag`
//! - the next non-flag token becomes the pending flag's value
//! - a flag followed by another flag (or nothing) is a presence flag (`true`)
//! - any other token is positional
//!
//! Single-valued: no flag stacking, no `--` terminator.

use std::collections::{BTreeMap, VecDeque};
use std::sync::OnceLock;

use regex::Regex;

use crate::inflector;
use crate::value::Value;

fn flag_pattern() -> &'static Regex {
    static FLAG_PATTERN: OnceLock<Regex> = OnceLock::new();
    FLAG_PATTERN.get_or_init(|| Regex::new(r"^--?(\S+)$").expect("flag pattern is valid"))
}

/// A raw argument value before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawArg {
    /// Value supplied as text
    Text(String),
    /// Flag given without a value
    Present,
}

impl RawArg {
    /// Resolver input form: text stays text, presence becomes `true`
    pub fn to_value(&self) -> Value {
        match self {
            RawArg::Text(s) => Value::String(s.clone()),
            RawArg::Present => Value::Boolean(true),
        }
    }
}

impl From<&str> for RawArg {
    fn from(s: &str) -> Self {
        RawArg::Text(s.to_string())
    }
}

impl From<String> for RawArg {
    fn from(s: String) -> Self {
        RawArg::Text(s)
    }
}

impl From<bool> for RawArg {
    fn from(present: bool) -> Self {
        if present {
            RawArg::Present
        } else {
            RawArg::Text("false".to_string())
        }
    }
}

/// Tokenizer output: positional values plus named flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentBundle {
    positional: VecDeque<String>,
    named: BTreeMap<String, RawArg>,
}

impl ArgumentBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle of positional values only
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: BTreeMap::new(),
        }
    }

    /// Append a positional value
    pub fn push(&mut self, value: impl Into<String>) -> &mut Self {
        self.positional.push_back(value.into());
        self
    }

    /// Set a named value; later values for the same key replace earlier ones
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RawArg>) -> &mut Self {
        self.named.insert(key.into(), value.into());
        self
    }

    /// Builder form of `set`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawArg>) -> Self {
        self.set(key, value);
        self
    }

    pub fn named(&self) -> &BTreeMap<String, RawArg> {
        &self.named
    }

    pub fn positionals(&self) -> impl Iterator<Item = &str> {
        self.positional.iter().map(String::as_str)
    }

    /// Remove and return the named value for `key`
    pub fn take_named(&mut self, key: &str) -> Option<RawArg> {
        self.named.remove(key)
    }

    /// Remove and return the next positional value
    pub fn shift(&mut self) -> Option<String> {
        self.positional.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Split argv into the command alias and its arguments.
///
/// The first element (program name) is discarded; the second, if present
/// and non-empty, is the alias.
pub fn tokenize<I, S>(argv: I) -> (Option<String>, ArgumentBundle)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut iter = argv.into_iter().map(Into::<String>::into);
    let _program = iter.next();
    let alias = iter.next().filter(|alias| !alias.is_empty());

    let mut bundle = ArgumentBundle::new();
    let mut pending: Option<String> = None;

    for arg in iter {
        if let Some(captures) = flag_pattern().captures(&arg) {
            if let Some(key) = pending.take() {
                bundle.set(key, RawArg::Present);
            }
            pending = Some(inflector::variable(&captures[1]));
        } else if let Some(key) = pending.take() {
            bundle.set(key, RawArg::Text(arg));
        } else {
            bundle.push(arg);
        }
    }

    if let Some(key) = pending {
        bundle.set(key, RawArg::Present);
    }

    (alias, bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_alias_and_positional() {
        let (alias, bundle) = tokenize(argv(&["prog", "cmd", "value"]));
        assert_eq!(alias.as_deref(), Some("cmd"));
        assert_eq!(bundle.positionals().collect::<Vec<_>>(), vec!["value"]);
        assert!(bundle.named().is_empty());
    }

    #[test]
    fn test_presence_flag_then_valued_flag() {
        let (_, bundle) = tokenize(argv(&["prog", "cmd", "--test", "--other", "v"]));
        assert_eq!(bundle.named().get("test"), Some(&RawArg::Present));
        assert_eq!(bundle.named().get("other"), Some(&RawArg::Text("v".to_string())));
        assert_eq!(bundle.positionals().count(), 0);
    }

    #[test]
    fn test_trailing_flag_is_present() {
        let (_, bundle) = tokenize(argv(&["prog", "cmd", "x", "-v"]));
        assert_eq!(bundle.named().get("v"), Some(&RawArg::Present));
        assert_eq!(bundle.positionals().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_kebab_flag_becomes_camel() {
        let (_, bundle) = tokenize(argv(&["prog", "cmd", "--dry-run", "yes"]));
        assert_eq!(bundle.named().get("dryRun"), Some(&RawArg::Text("yes".to_string())));
    }

    #[test]
    fn test_no_alias() {
        let (alias, bundle) = tokenize(argv(&["prog"]));
        assert!(alias.is_none());
        assert!(bundle.is_empty());

        let (alias, _) = tokenize(argv(&["prog", ""]));
        assert!(alias.is_none());
    }

    #[test]
    fn test_lone_dash_is_positional() {
        let (_, bundle) = tokenize(argv(&["prog", "cmd", "-", "x"]));
        assert_eq!(bundle.positionals().collect::<Vec<_>>(), vec!["-", "x"]);
    }

    #[test]
    fn test_repeated_flag_keeps_last() {
        let (_, bundle) = tokenize(argv(&["prog", "cmd", "--a", "1", "--a", "2"]));
        assert_eq!(bundle.named().get("a"), Some(&RawArg::Text("2".to_string())));
    }

    #[test]
    fn test_bundle_shift_and_take() {
        let mut bundle = ArgumentBundle::positional(["one", "two"]).with("key", "v");
        assert_eq!(bundle.take_named("key"), Some(RawArg::Text("v".to_string())));
        assert_eq!(bundle.take_named("key"), None);
        assert_eq!(bundle.shift().as_deref(), Some("one"));
        assert_eq!(bundle.shift().as_deref(), Some("two"));
        assert_eq!(bundle.shift(), None);
    }
}
