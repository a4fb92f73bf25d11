//! Commandeer: command registry and argument resolution
//!
//! Commands are plain types registered in a [`Catalog`]. A [`CommandRunner`]
//! discovers them under namespace roots, binds command-line arguments to
//! their declared options (prompting for anything required that is
//! missing) and runs them.
//!
//! ```text
//! argv ─ tokenize ─▶ alias + ArgumentBundle
//!                         │
//! namespaces ─ discover ─▶ CommandMap ─▶ CommandDescriptor
//!                                              │
//!                    Resolver (+ Console) ─────▶ ResolvedOptions ─▶ Command::run
//! ```

pub mod catalog;
pub mod command;
pub mod commands;
pub mod config;
pub mod console;
pub mod discovery;
pub mod error;
pub mod events;
pub mod inflector;
pub mod loader;
pub mod logging;
pub mod namespace;
pub mod option;
pub mod resolver;
pub mod runner;
pub mod tokenizer;
pub mod types;
pub mod value;

pub use catalog::{Catalog, CatalogEntry, Container};
pub use command::{Command, CommandDefinition, CommandDescriptor, CommandResult, CommandType, Input, ResolvedOptions};
pub use crate::config::RunnerConfig;
pub use console::{Color, Console, ScriptedConsole, Terminal};
pub use discovery::{CommandMap, DiscoveryEngine, DiscoveryOptions};
pub use error::{Error, Result};
pub use events::{CommandEvent, CommandListener, EventManager};
pub use loader::{CatalogTree, PathMap, SourceEntry, SourceLoader};
pub use namespace::{Namespace, NamespaceSet};
pub use option::{AllowedValues, OptionSchema, OptionSpec};
pub use resolver::Resolver;
pub use runner::CommandRunner;
pub use tokenizer::{tokenize, ArgumentBundle, RawArg};
pub use types::{TypeParser, ValueType};
pub use value::{FromValue, Value};

/// Process exit code
pub type ExitCode = i32;

/// Exit code for success
pub const CODE_SUCCESS: ExitCode = 0;

/// Exit code for a general error
pub const CODE_ERROR: ExitCode = 1;
