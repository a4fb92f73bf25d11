//! Command runner
//!
//! Owns the namespace roots, the cached discovery result and everything
//! needed to invoke a command:
//!
//! ```text
//! handle(argv) → tokenize → run(alias, bundle)
//!                              ├─ all()        cached CommandMap (discover on miss)
//!                              ├─ resolve      ArgumentBundle → ResolvedOptions
//!                              ├─ build        fresh instance from the container
//!                              └─ run          BeforeExecute / AfterExecute events
//! ```
//!
//! The namespace set and the cache share one lock. Every namespace mutation
//! clears the cache while holding it, and discovery publishes its result
//! while holding it, so `all()` can never observe a map built from a stale
//! namespace set. Readers of an already published map do not take the lock.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use arc_swap::ArcSwapOption;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Container};
use crate::command::Input;
use crate::console::{Color, Console};
use crate::discovery::{CommandMap, DiscoveryEngine, DiscoveryOptions};
use crate::error::{Error, Result};
use crate::events::{CommandEvent, CommandListener, EventManager};
use crate::loader::SourceLoader;
use crate::namespace::{Namespace, NamespaceSet};
use crate::resolver::Resolver;
use crate::tokenizer::{tokenize, ArgumentBundle};
use crate::types::TypeParser;
use crate::{ExitCode, CODE_ERROR, CODE_SUCCESS};

/// Headers of the command listing table
pub const LISTING_HEADERS: [&str; 3] = ["Command", "Description", "Options"];

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Command registry and dispatcher
pub struct CommandRunner {
    catalog: Arc<Catalog>,
    container: Arc<dyn Container>,
    loader: Box<dyn SourceLoader>,
    options: DiscoveryOptions,
    types: TypeParser,
    console: Arc<dyn Console>,
    events: EventManager,
    namespaces: Mutex<NamespaceSet>,
    commands: ArcSwapOption<CommandMap>,
}

impl CommandRunner {
    pub fn new(catalog: Catalog, loader: impl SourceLoader + 'static, console: Arc<dyn Console>) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            container: Arc::clone(&catalog) as Arc<dyn Container>,
            catalog,
            loader: Box::new(loader),
            options: DiscoveryOptions::default(),
            types: TypeParser::new(),
            console,
            events: EventManager::new(),
            namespaces: Mutex::new(NamespaceSet::new()),
            commands: ArcSwapOption::empty(),
        }
    }

    /// Register namespace roots at construction
    pub fn with_namespaces<I, N>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Namespace>,
    {
        for namespace in namespaces {
            self.add_namespace(namespace);
        }
        self
    }

    pub fn with_discovery_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self.commands.store(None);
        self
    }

    /// Build commands through `container` instead of the catalog
    pub fn with_container(mut self, container: Arc<dyn Container>) -> Self {
        self.container = container;
        self
    }

    pub fn with_types(mut self, types: TypeParser) -> Self {
        self.types = types;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn CommandListener>) -> Self {
        self.events.add(listener);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn console(&self) -> &dyn Console {
        self.console.as_ref()
    }

    fn lock_namespaces(&self) -> MutexGuard<'_, NamespaceSet> {
        // The set is always left consistent, so a poisoned lock is still usable
        self.namespaces.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a namespace root. Returns `false` if it was already registered.
    pub fn add_namespace(&self, namespace: impl Into<Namespace>) -> bool {
        let namespace = namespace.into();
        let mut namespaces = self.lock_namespaces();
        let added = namespaces.add(namespace.clone());
        if added {
            debug!("runner: added namespace {}", namespace);
            self.commands.store(None);
        }
        added
    }

    /// Remove a namespace root. Returns `false` if it was not registered.
    pub fn remove_namespace(&self, namespace: impl Into<Namespace>) -> bool {
        let namespace = namespace.into();
        let mut namespaces = self.lock_namespaces();
        let removed = namespaces.remove(namespace.clone());
        if removed {
            debug!("runner: removed namespace {}", namespace);
            self.commands.store(None);
        }
        removed
    }

    pub fn has_namespace(&self, namespace: impl Into<Namespace>) -> bool {
        self.lock_namespaces().has(namespace)
    }

    /// Registered roots in insertion order
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.lock_namespaces().list().to_vec()
    }

    /// Forget every namespace root and the cached commands
    pub fn clear(&self) {
        let mut namespaces = self.lock_namespaces();
        namespaces.clear();
        self.commands.store(None);
        debug!("runner: cleared namespaces and command cache");
    }

    /// All discovered commands, discovering on first use
    pub fn all(&self) -> Arc<CommandMap> {
        if let Some(commands) = self.commands.load_full() {
            return commands;
        }

        let namespaces = self.lock_namespaces();
        // Another thread may have published while we waited
        if let Some(commands) = self.commands.load_full() {
            return commands;
        }

        debug!("runner: command cache miss, discovering {} namespace(s)", namespaces.len());
        let engine = DiscoveryEngine::new(&self.catalog, self.loader.as_ref(), &self.options);
        let commands = Arc::new(engine.discover(namespaces.list()));
        self.commands.store(Some(Arc::clone(&commands)));

        // Listeners may call back into the runner
        drop(namespaces);
        self.events.dispatch(CommandEvent::BuildCommands {
            commands: &commands,
        });
        commands
    }

    pub fn has_command(&self, alias: &str) -> bool {
        self.all().contains(alias)
    }

    /// Run a command, returning every failure as a typed error
    pub fn try_run(&self, alias: &str, arguments: ArgumentBundle) -> Result<ExitCode> {
        let commands = self.all();
        let descriptor = commands
            .get(alias)
            .ok_or_else(|| Error::InvalidCommand(alias.to_string()))?;

        if !self.container.is_runnable(&descriptor.type_ref) {
            return Err(Error::MissingRun(alias.to_string()));
        }

        let options = Resolver::new(&self.types, self.console.as_ref()).resolve(descriptor, arguments)?;
        let mut command = self.container.build(&descriptor.type_ref)?;

        info!("runner: running {} ({})", alias, descriptor.type_ref);
        self.events.dispatch(CommandEvent::BeforeExecute {
            alias,
            options: &options,
        });

        let input = Input::new(alias, &options, self.console.as_ref());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| command.run(&input)))
            .unwrap_or_else(|payload| Err(anyhow!("panicked: {}", panic_message(payload.as_ref()))));
        let result = outcome
            .map_err(|source| Error::Command {
                alias: alias.to_string(),
                source,
            })?
            .unwrap_or(CODE_SUCCESS);

        self.events.dispatch(CommandEvent::AfterExecute {
            alias,
            options: &options,
            result,
        });
        debug!("runner: {} exited with {}", alias, result);

        Ok(result)
    }

    /// Run a command; failures are reported once through the console
    pub fn run(&self, alias: &str, arguments: ArgumentBundle) -> ExitCode {
        match self.try_run(alias, arguments) {
            Ok(code) => code,
            Err(e) => {
                warn!("runner: {}", e);
                self.console.error(&e.to_string());
                CODE_ERROR
            }
        }
    }

    /// Process entry point: `argv[0]` is the program, `argv[1]` the alias.
    ///
    /// With no alias, lists every command.
    pub fn handle<I, S>(&self, argv: I) -> ExitCode
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (alias, arguments) = tokenize(argv);
        match alias {
            Some(alias) => self.run(&alias, arguments),
            None => {
                self.list();
                CODE_SUCCESS
            }
        }
    }

    /// Render the command listing table
    pub fn list(&self) {
        let commands = self.all();
        let rows: Vec<Vec<String>> = commands
            .iter()
            .map(|descriptor| {
                vec![
                    self.console.style(&descriptor.alias, Color::Green),
                    descriptor.description.clone(),
                    descriptor.option_list(),
                ]
            })
            .collect();
        self.console.table(&rows, &LISTING_HEADERS);
    }
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("catalog", &self.catalog.len())
            .field("options", &self.options)
            .field("namespaces", &self.namespaces())
            .field("cached", &self.commands.load().is_some())
            .finish()
    }
}
