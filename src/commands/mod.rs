//! Built-in commands shipped with the binary
//!
//! Each command lives in a `*_command.rs` file so the catalog-backed source
//! tree mirrors this directory. Nested directories become dotted aliases
//! (`calendar/days_until_command.rs` → `calendar.days_until`).

pub mod calendar;
mod echo_command;
mod greet_command;

pub use calendar::DaysUntilCommand;
pub use echo_command::EchoCommand;
pub use greet_command::GreetCommand;

use crate::catalog::Catalog;
use crate::config::DEFAULT_NAMESPACE;

/// Register every built-in command under `commandeer::commands`
pub fn register_builtin(catalog: &mut Catalog) -> &mut Catalog {
    catalog
        .register::<EchoCommand>(DEFAULT_NAMESPACE)
        .register::<GreetCommand>(DEFAULT_NAMESPACE)
        .register::<DaysUntilCommand>(calendar::NAMESPACE)
}
