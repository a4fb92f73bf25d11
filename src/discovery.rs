//! Command discovery engine
//!
//! # Discovery Algorithm
//!
//! 1. For each namespace root, search every ancestor decomposition
//!    (`a::b::c` → `a::b::c::` + ``, `a::b::` + `c/`, `a::` + `b/c/`)
//! 2. Walk each resolved directory recursively; sub-directories extend the
//!    sub-namespace prefix
//! 3. Files whose stem ends with the command suffix are candidates; the
//!    candidate's type reference is root + prefix + PascalCase(stem)
//! 4. Skip candidates that are not in the catalog, are abstract, or declare
//!    an invalid option schema
//! 5. Merge by alias, last writer wins, and sort by alias in natural order
//!
//! Discovery never fails: anything unusable is logged and skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::command::{CommandDefinition, CommandDescriptor};
use crate::error::{Error, Result};
use crate::inflector;
use crate::loader::SourceLoader;
use crate::namespace::Namespace;

/// Declaration-time checks on a command's option schema
pub fn check_definition(entry: &CatalogEntry, definition: &CommandDefinition) -> Result<()> {
    definition
        .options
        .validate()
        .map_err(|reason| Error::InvalidDefinition {
            type_ref: entry.type_ref.clone(),
            reason,
        })
}

/// Default file-stem suffix marking a command source unit
pub const DEFAULT_SUFFIX: &str = "_command";

/// Default source unit extension
pub const DEFAULT_EXTENSION: &str = "rs";

/// Candidate naming convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    /// Required file-stem suffix
    pub command_suffix: String,
    /// Required extension; `None` accepts any
    pub extension: Option<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            command_suffix: DEFAULT_SUFFIX.to_string(),
            extension: Some(DEFAULT_EXTENSION.to_string()),
        }
    }
}

impl DiscoveryOptions {
    /// Type name for a candidate file name, or `None` if it is not a candidate
    pub fn candidate_type_name(&self, file_name: &str) -> Option<String> {
        let path = Path::new(file_name);
        let stem = path.file_stem()?.to_str()?;

        if let Some(expected) = self.extension.as_deref().filter(|e| !e.is_empty()) {
            let actual = path.extension().and_then(|e| e.to_str());
            if actual != Some(expected) {
                return None;
            }
        }

        if stem.len() <= self.command_suffix.len() || !stem.ends_with(&self.command_suffix) {
            return None;
        }

        Some(inflector::pascal(stem))
    }
}

/// Discovered commands keyed by alias, iterated in natural alias order
#[derive(Debug, Clone, Default)]
pub struct CommandMap {
    commands: Vec<CommandDescriptor>,
    index: HashMap<String, usize>,
}

impl CommandMap {
    /// Build from descriptors with unique aliases
    pub fn from_descriptors<I: IntoIterator<Item = CommandDescriptor>>(descriptors: I) -> Self {
        let mut commands: Vec<CommandDescriptor> = descriptors.into_iter().collect();
        commands.sort_by(|a, b| inflector::natural_cmp(&a.alias, &b.alias));
        commands.dedup_by(|later, earlier| {
            let same = later.alias == earlier.alias;
            if same {
                *earlier = later.clone();
            }
            same
        });

        let index = commands
            .iter()
            .enumerate()
            .map(|(i, descriptor)| (descriptor.alias.clone(), i))
            .collect();

        Self { commands, index }
    }

    pub fn get(&self, alias: &str) -> Option<&CommandDescriptor> {
        self.index.get(alias).map(|&i| &self.commands[i])
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.index.contains_key(alias)
    }

    /// Descriptors in alias order
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.alias.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl PartialEq for CommandMap {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands
    }
}

impl<'a> IntoIterator for &'a CommandMap {
    type Item = &'a CommandDescriptor;
    type IntoIter = std::slice::Iter<'a, CommandDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Discovery engine: turns namespace roots into a `CommandMap`
pub struct DiscoveryEngine<'a> {
    catalog: &'a Catalog,
    loader: &'a dyn SourceLoader,
    options: &'a DiscoveryOptions,
}

impl<'a> DiscoveryEngine<'a> {
    pub fn new(catalog: &'a Catalog, loader: &'a dyn SourceLoader, options: &'a DiscoveryOptions) -> Self {
        Self {
            catalog,
            loader,
            options,
        }
    }

    /// Discover every command reachable from `roots`
    pub fn discover(&self, roots: &[Namespace]) -> CommandMap {
        let mut found: HashMap<String, CommandDescriptor> = HashMap::new();

        for root in roots {
            for (head, tail) in root.decompose() {
                for base in self.loader.namespace_paths(&head) {
                    let dir: PathBuf = tail.iter().fold(base, |path, segment| path.join(segment));

                    if !self.loader.is_dir(&dir) {
                        debug!("discovery: {} has no directory {}", root, dir.display());
                        continue;
                    }

                    let mut prefix = Vec::new();
                    self.scan(&dir, root, &mut prefix, &mut found);
                }
            }
        }

        let map = CommandMap::from_descriptors(found.into_values());
        info!("discovery: {} command(s) from {} namespace(s)", map.len(), roots.len());
        map
    }

    fn scan(
        &self,
        dir: &Path,
        root: &Namespace,
        prefix: &mut Vec<String>,
        found: &mut HashMap<String, CommandDescriptor>,
    ) {
        let entries = match self.loader.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("discovery: cannot list {}: {}", dir.display(), e);
                return;
            }
        };

        for entry in entries {
            if entry.is_dir {
                prefix.push(entry.name.clone());
                self.scan(&dir.join(&entry.name), root, prefix, found);
                prefix.pop();
                continue;
            }

            let Some(type_name) = self.options.candidate_type_name(&entry.name) else {
                continue;
            };

            if let Some(descriptor) = self.describe(root, prefix, &type_name) {
                merge(found, descriptor);
            }
        }
    }

    fn describe(&self, root: &Namespace, prefix: &[String], type_name: &str) -> Option<CommandDescriptor> {
        let mut segments: Vec<&str> = root.segments();
        segments.extend(prefix.iter().map(String::as_str));
        let type_ref = Namespace::from_segments(&segments).qualify(type_name);

        let Some(entry) = self.catalog.lookup(&type_ref) else {
            debug!("discovery: skipping {} (not registered)", type_ref);
            return None;
        };

        if entry.is_abstract() {
            debug!("discovery: skipping {} (abstract)", entry.type_ref);
            return None;
        }

        let definition = (entry.definition)();
        if let Err(e) = check_definition(entry, &definition) {
            warn!("discovery: skipping: {}", e);
            return None;
        }

        Some(CommandDescriptor::from_definition(
            entry.type_ref.clone(),
            &entry.type_name,
            prefix,
            definition,
        ))
    }
}

/// Insert by alias; a later descriptor replaces an earlier one
fn merge(found: &mut HashMap<String, CommandDescriptor>, descriptor: CommandDescriptor) {
    if let Some(previous) = found.get(&descriptor.alias) {
        if previous.type_ref != descriptor.type_ref {
            warn!(
                "discovery: alias '{}' from {} shadows {}",
                descriptor.alias, descriptor.type_ref, previous.type_ref
            );
        }
    }
    found.insert(descriptor.alias.clone(), descriptor);
}
