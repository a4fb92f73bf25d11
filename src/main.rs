//! Commandeer CLI
//!
//! ```text
//! commandeer                      list commands
//! commandeer <alias> [args...]    run a command
//! ```
//!
//! Commands come from the compiled-in catalog. When `paths` is configured,
//! discovery walks those directories instead of the catalog's own layout.

use std::sync::Arc;

use anyhow::Context;

use commandeer::{commands, logging, Catalog, CatalogTree, CommandRunner, Console, RunnerConfig, Terminal};

fn main() -> anyhow::Result<()> {
    let config = RunnerConfig::load().context("loading configuration")?;
    logging::init(&config.log_level);

    let mut catalog = Catalog::new();
    commands::register_builtin(&mut catalog);

    let options = config.discovery_options();
    let console: Arc<dyn Console> = Arc::new(Terminal::new());

    let runner = match config.path_map() {
        Some(paths) => CommandRunner::new(catalog, paths, console),
        None => {
            let tree = CatalogTree::new(&catalog, options.extension.as_deref());
            CommandRunner::new(catalog, tree, console)
        }
    };
    let runner = runner
        .with_discovery_options(options)
        .with_namespaces(config.namespaces.iter().map(String::as_str));

    let code = runner.handle(std::env::args());
    std::process::exit(code);
}
