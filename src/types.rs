//! Type conversion registry
//!
//! Each logical type name declared by an option (`"string"`, `"integer"`,
//! `"date"`, ...) maps to a `ValueType` that converts a raw value into a
//! typed one. `parse` returns `None` when the input cannot be converted;
//! the resolver treats that exactly like a missing value.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use tracing::warn;

use crate::value::Value;

/// Logical type used when an option does not declare one
pub const DEFAULT_TYPE: &str = "string";

/// Converts raw option input into a typed `Value`
pub trait ValueType: Send + Sync {
    /// Logical type name used in option declarations
    fn name(&self) -> &str;

    /// Convert `raw`, returning `None` when it is not a valid value of this type
    fn parse(&self, raw: &Value) -> Option<Value>;
}

/// Registry of value types keyed by logical name
#[derive(Clone)]
pub struct TypeParser {
    types: HashMap<String, Arc<dyn ValueType>>,
}

impl TypeParser {
    /// Registry with the built-in types
    pub fn new() -> Self {
        let mut parser = Self::empty();
        parser.register(StringType);
        parser.register(IntegerType);
        parser.register(FloatType);
        parser.register(BooleanType);
        parser.register(DateType);
        parser.register(DateTimeType);
        parser.register(JsonType);
        parser
    }

    /// Registry with no types at all
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register (or replace) a type under its own name
    pub fn register<T: ValueType + 'static>(&mut self, value_type: T) -> &mut Self {
        self.types
            .insert(value_type.name().to_string(), Arc::new(value_type));
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Look up a type by name, falling back to `string` for unknown names
    pub fn use_type(&self, name: &str) -> Arc<dyn ValueType> {
        if let Some(value_type) = self.types.get(name) {
            return Arc::clone(value_type);
        }
        warn!("Unknown option type '{}', treating as {}", name, DEFAULT_TYPE);
        self.types
            .get(DEFAULT_TYPE)
            .cloned()
            .unwrap_or_else(|| Arc::new(StringType))
    }

    /// Convert `raw` with the named type. `None` input stays `None`.
    pub fn parse(&self, name: &str, raw: Option<&Value>) -> Option<Value> {
        raw.and_then(|raw| self.use_type(name).parse(raw))
    }
}

impl Default for TypeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.types.keys().collect();
        names.sort();
        f.debug_struct("TypeParser").field("types", &names).finish()
    }
}

/// Free text
pub struct StringType;

impl ValueType for StringType {
    fn name(&self) -> &str {
        "string"
    }

    fn parse(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::String(s) => Some(Value::String(s.clone())),
            Value::Boolean(true) => Some(Value::String("1".to_string())),
            Value::Boolean(false) => Some(Value::String(String::new())),
            Value::Json(serde_json::Value::String(s)) => Some(Value::String(s.clone())),
            other => Some(Value::String(other.to_string())),
        }
    }
}

/// Signed 64-bit integers
pub struct IntegerType;

impl ValueType for IntegerType {
    fn name(&self) -> &str {
        "integer"
    }

    fn parse(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Integer(i) => Some(Value::Integer(*i)),
            Value::Float(f) if f.is_finite() => Some(Value::Integer(f.trunc() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok().map(Value::Integer),
            _ => None,
        }
    }
}

/// Floating point numbers
pub struct FloatType;

impl ValueType for FloatType {
    fn name(&self) -> &str {
        "float"
    }

    fn parse(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Float(f) => Some(Value::Float(*f)),
            Value::Integer(i) => Some(Value::Float(*i as f64)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            _ => None,
        }
    }
}

/// Booleans from the registry side.
///
/// The resolver applies its own truthy-string policy to options declared
/// `boolean`; this type is used when a boolean value is converted through
/// the registry directly.
pub struct BooleanType;

impl ValueType for BooleanType {
    fn name(&self) -> &str {
        "boolean"
    }

    fn parse(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Boolean(b) => Some(Value::Boolean(*b)),
            Value::Integer(i) => Some(Value::Boolean(*i != 0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "y" | "yes" | "on" => Some(Value::Boolean(true)),
                "0" | "false" | "n" | "no" | "off" | "" => Some(Value::Boolean(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Calendar dates as `YYYY-MM-DD`, or `today`/`now`
pub struct DateType;

impl ValueType for DateType {
    fn name(&self) -> &str {
        "date"
    }

    fn parse(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Date(d) => Some(Value::Date(*d)),
            Value::DateTime(dt) => Some(Value::Date(dt.date_naive())),
            Value::String(s) => {
                let s = s.trim();
                match s.to_ascii_lowercase().as_str() {
                    "today" | "now" => Some(Value::Date(Local::now().date_naive())),
                    _ => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .map(Value::Date),
                }
            }
            _ => None,
        }
    }
}

/// RFC 3339 timestamps
pub struct DateTimeType;

impl ValueType for DateTimeType {
    fn name(&self) -> &str {
        "datetime"
    }

    fn parse(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::DateTime(dt) => Some(Value::DateTime(*dt)),
            Value::String(s) => match s.trim() {
                "now" => Some(Value::DateTime(Local::now().fixed_offset())),
                other => DateTime::parse_from_rfc3339(other).ok().map(Value::DateTime),
            },
            _ => None,
        }
    }
}

/// Arbitrary JSON documents
pub struct JsonType;

impl ValueType for JsonType {
    fn name(&self) -> &str {
        "json"
    }

    fn parse(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Json(json) => Some(Value::Json(json.clone())),
            Value::String(s) => serde_json::from_str(s).ok().map(Value::Json),
            other => serde_json::to_value(other).ok().map(Value::Json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_types_registered() {
        let parser = TypeParser::new();
        for name in ["string", "integer", "float", "boolean", "date", "datetime", "json"] {
            assert!(parser.has(name), "{} should be registered", name);
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_string() {
        let parser = TypeParser::new();
        assert_eq!(parser.use_type("decimal").name(), "string");
    }

    #[test]
    fn test_parse_none_stays_none() {
        let parser = TypeParser::new();
        assert_eq!(parser.parse("string", None), None);
    }

    #[test]
    fn test_integer_parse() {
        let parser = TypeParser::new();
        assert_eq!(
            parser.parse("integer", Some(&Value::from(" 42 "))),
            Some(Value::Integer(42))
        );
        assert_eq!(parser.parse("integer", Some(&Value::from("forty"))), None);
        assert_eq!(parser.parse("integer", Some(&Value::Boolean(true))), None);
    }

    #[test]
    fn test_float_rejects_nan() {
        let parser = TypeParser::new();
        assert_eq!(parser.parse("float", Some(&Value::from("NaN"))), None);
        assert_eq!(
            parser.parse("float", Some(&Value::from("1.5"))),
            Some(Value::Float(1.5))
        );
    }

    #[test]
    fn test_date_parse() {
        let parser = TypeParser::new();
        let parsed = parser.parse("date", Some(&Value::from("2024-02-29")));
        assert_eq!(
            parsed,
            Some(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert_eq!(parser.parse("date", Some(&Value::from("2024-02-30"))), None);
        assert_eq!(
            parser.parse("date", Some(&Value::from("today"))),
            Some(Value::Date(Local::now().date_naive()))
        );
    }

    #[test]
    fn test_json_parse() {
        let parser = TypeParser::new();
        let parsed = parser.parse("json", Some(&Value::from(r#"{"a":1}"#)));
        assert_eq!(parsed, Some(Value::Json(serde_json::json!({"a": 1}))));
        assert_eq!(parser.parse("json", Some(&Value::from("{oops"))), None);
    }

    #[test]
    fn test_string_parse_keeps_empty() {
        let parser = TypeParser::new();
        assert_eq!(
            parser.parse("string", Some(&Value::from(""))),
            Some(Value::from(""))
        );
    }
}
