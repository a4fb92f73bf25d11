//! Command type catalog
//!
//! Init-time table of every command type the process knows about, keyed by
//! fully-qualified type reference (`tests::mock::ArgumentsCommand`).
//! Discovery asks the catalog whether a candidate exists instead of probing
//! for types at runtime, and the runner asks it to build instances.

use std::collections::BTreeMap;

use tracing::debug;

use crate::command::{Command, CommandDefinition, CommandType};
use crate::error::{Error, Result};
use crate::namespace::Namespace;

/// Builds a fresh command instance
pub type Constructor = fn() -> Box<dyn Command>;

fn construct<C: CommandType>() -> Box<dyn Command> {
    Box::new(C::build())
}

/// Registered command type
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Fully-qualified type reference
    pub type_ref: String,
    /// Short type name (last path segment)
    pub type_name: String,
    /// Static metadata accessor
    pub definition: fn() -> CommandDefinition,
    /// `None` for abstract types, which discovery skips
    pub constructor: Option<Constructor>,
}

impl CatalogEntry {
    pub fn is_abstract(&self) -> bool {
        self.constructor.is_none()
    }
}

/// Construction collaborator
pub trait Container: Send + Sync {
    /// Build a new instance of the referenced type
    fn build(&self, type_ref: &str) -> Result<Box<dyn Command>>;

    /// Whether the referenced type has an invocable entry point
    fn is_runnable(&self, type_ref: &str) -> bool;
}

/// Table of known command types
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concrete command type under `namespace`
    pub fn register<C: CommandType>(&mut self, namespace: impl Into<Namespace>) -> &mut Self {
        let namespace = namespace.into();
        self.insert(CatalogEntry {
            type_ref: namespace.qualify(C::TYPE_NAME),
            type_name: C::TYPE_NAME.to_string(),
            definition: C::definition,
            constructor: Some(construct::<C> as Constructor),
        })
    }

    /// Register a type that shares the command contract but cannot be built
    pub fn register_abstract(
        &mut self,
        namespace: impl Into<Namespace>,
        type_name: &str,
        definition: fn() -> CommandDefinition,
    ) -> &mut Self {
        let namespace = namespace.into();
        self.insert(CatalogEntry {
            type_ref: namespace.qualify(type_name),
            type_name: type_name.to_string(),
            definition,
            constructor: None,
        })
    }

    /// Insert a prepared entry, replacing any entry with the same reference
    pub fn insert(&mut self, entry: CatalogEntry) -> &mut Self {
        debug!("catalog: registered {}", entry.type_ref);
        self.entries.insert(entry.type_ref.clone(), entry);
        self
    }

    pub fn get(&self, type_ref: &str) -> Option<&CatalogEntry> {
        self.entries.get(type_ref)
    }

    pub fn contains(&self, type_ref: &str) -> bool {
        self.entries.contains_key(type_ref)
    }

    /// Find a type by reference, tolerating case differences.
    ///
    /// File stems are snake_case, so `http_server_command` derives
    /// `HttpServerCommand` while the type may be `HTTPServerCommand`.
    pub fn lookup(&self, type_ref: &str) -> Option<&CatalogEntry> {
        self.get(type_ref).or_else(|| {
            self.entries
                .values()
                .find(|entry| entry.type_ref.eq_ignore_ascii_case(type_ref))
        })
    }

    /// Type references in lexicographic order
    pub fn type_refs(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Container for Catalog {
    fn build(&self, type_ref: &str) -> Result<Box<dyn Command>> {
        let entry = self.get(type_ref).ok_or_else(|| Error::Construction {
            type_ref: type_ref.to_string(),
            reason: "type is not registered".to_string(),
        })?;

        let constructor = entry.constructor.ok_or_else(|| Error::Construction {
            type_ref: type_ref.to_string(),
            reason: "type is abstract".to_string(),
        })?;

        Ok(constructor())
    }

    fn is_runnable(&self, type_ref: &str) -> bool {
        self.get(type_ref).map_or(false, |entry| !entry.is_abstract())
    }
}
