//! Command lifecycle notifications
//!
//! Listeners are called synchronously, in registration order, on the
//! thread that triggered the event.

use std::sync::Arc;

use crate::command::ResolvedOptions;
use crate::discovery::CommandMap;
use crate::ExitCode;

/// Lifecycle event
#[derive(Debug, Clone, Copy)]
pub enum CommandEvent<'a> {
    /// A discovery pass finished and its result is about to be cached
    BuildCommands { commands: &'a CommandMap },
    /// Options are resolved; the command is about to run
    BeforeExecute {
        alias: &'a str,
        options: &'a ResolvedOptions,
    },
    /// The command returned normally
    AfterExecute {
        alias: &'a str,
        options: &'a ResolvedOptions,
        result: ExitCode,
    },
}

impl CommandEvent<'_> {
    /// Dotted event name, e.g. `command.before_execute`
    pub fn name(&self) -> &'static str {
        match self {
            CommandEvent::BuildCommands { .. } => "command.build_commands",
            CommandEvent::BeforeExecute { .. } => "command.before_execute",
            CommandEvent::AfterExecute { .. } => "command.after_execute",
        }
    }
}

/// Observer of command lifecycle events
pub trait CommandListener: Send + Sync {
    fn on_event(&self, event: &CommandEvent<'_>);
}

/// Listener that ignores everything (for testing)
#[derive(Clone, Copy)]
pub struct NoopListener;

impl CommandListener for NoopListener {
    fn on_event(&self, _event: &CommandEvent<'_>) {}
}

/// Ordered list of listeners
#[derive(Clone, Default)]
pub struct EventManager {
    listeners: Vec<Arc<dyn CommandListener>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Arc<dyn CommandListener>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    pub fn dispatch(&self, event: CommandEvent<'_>) {
        tracing::trace!("event: {} -> {} listener(s)", event.name(), self.listeners.len());
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
