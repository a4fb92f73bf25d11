//! Option specification model
//!
//! Every command declares an ordered schema of options. The order matters:
//! positional arguments are consumed by options in declaration order.

use serde::{Deserialize, Serialize};

use crate::types::DEFAULT_TYPE;
use crate::value::Value;

/// Logical type with its own truthy-string handling in the resolver
pub const BOOLEAN_TYPE: &str = "boolean";

/// Enumerated choices for an option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedValues {
    /// Plain list: each value is its own key
    List(Vec<String>),
    /// Keyed mapping: key → label shown when choosing
    Keyed(Vec<(String, String)>),
}

impl AllowedValues {
    /// Keys used for membership checks
    pub fn keys(&self) -> Vec<&str> {
        match self {
            AllowedValues::List(values) => values.iter().map(String::as_str).collect(),
            AllowedValues::Keyed(pairs) => pairs.iter().map(|(k, _)| k.as_str()).collect(),
        }
    }

    /// `(key, label)` pairs in declaration order
    pub fn entries(&self) -> Vec<(&str, &str)> {
        match self {
            AllowedValues::List(values) => values.iter().map(|v| (v.as_str(), v.as_str())).collect(),
            AllowedValues::Keyed(pairs) => pairs.iter().map(|(k, l)| (k.as_str(), l.as_str())).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }

    /// Membership for a raw value. Only string values can name a key.
    pub fn contains_value(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => self.contains(s),
            Value::Integer(i) => self.contains(&i.to_string()),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AllowedValues::List(values) => values.len(),
            AllowedValues::Keyed(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Declarative schema for one command option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Text shown when the value is requested interactively
    pub prompt: String,
    pub allowed_values: Option<AllowedValues>,
    pub required: bool,
    /// Logical type name resolved against the type registry
    pub logical_type: String,
    pub default_value: Option<Value>,
}

impl OptionSpec {
    /// Optional string option with the given prompt text
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            allowed_values: None,
            required: false,
            logical_type: DEFAULT_TYPE.to_string(),
            default_value: None,
        }
    }

    /// Boolean option
    pub fn boolean(prompt: impl Into<String>) -> Self {
        Self::new(prompt).of_type(BOOLEAN_TYPE)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn of_type(mut self, logical_type: impl Into<String>) -> Self {
        self.logical_type = logical_type.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Restrict to a plain list of values
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(AllowedValues::List(
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Restrict to keyed values with display labels
    pub fn with_keyed_values<I, K, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        self.allowed_values = Some(AllowedValues::Keyed(
            values.into_iter().map(|(k, l)| (k.into(), l.into())).collect(),
        ));
        self
    }

    pub fn is_boolean(&self) -> bool {
        self.logical_type == BOOLEAN_TYPE
    }

    pub fn is_enumerated(&self) -> bool {
        self.allowed_values.is_some()
    }

    /// Check declaration-time invariants.
    ///
    /// A default for an enumerated option must be one of its keys.
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(allowed), Some(default)) = (&self.allowed_values, &self.default_value) {
            if allowed.is_empty() {
                return Err("allowed values are empty".to_string());
            }
            if !allowed.contains_value(default) {
                return Err(format!(
                    "default '{}' is not one of [{}]",
                    default,
                    allowed.keys().join(", ")
                ));
            }
        }
        Ok(())
    }
}

/// Ordered mapping from option key to `OptionSpec`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSchema {
    entries: Vec<(String, OptionSpec)>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option. Re-declaring a key replaces the spec in place.
    pub fn option(mut self, key: impl Into<String>, spec: OptionSpec) -> Self {
        self.insert(key, spec);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, spec: OptionSpec) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = spec,
            None => self.entries.push((key, spec)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OptionSpec> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, spec)| spec)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in declaration order
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.entries.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate every spec, naming the first offending key
    pub fn validate(&self) -> Result<(), String> {
        for (key, spec) in &self.entries {
            spec.validate().map_err(|reason| format!("option '{}': {}", key, reason))?;
        }
        Ok(())
    }
}
