//! Date arithmetic commands

mod days_until_command;

pub use days_until_command::DaysUntilCommand;

pub const NAMESPACE: &str = "commandeer::commands::calendar";
