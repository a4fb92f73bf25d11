//! Namespace path resolution
//!
//! Discovery only needs two things from the outside world: which
//! directories belong to a namespace, and what those directories contain.
//! `PathMap` answers from the real filesystem; `CatalogTree` answers from
//! the catalog itself so compiled-in commands can be discovered with no
//! source tree on disk.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::catalog::Catalog;
use crate::inflector;
use crate::namespace::{Namespace, SEPARATOR};

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceEntry {
    pub name: String,
    pub is_dir: bool,
}

impl SourceEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Path-resolution collaborator
pub trait SourceLoader: Send + Sync {
    /// Directories registered for exactly this namespace
    fn namespace_paths(&self, namespace: &Namespace) -> Vec<PathBuf>;

    /// Entries of a directory, sorted by name
    fn read_dir(&self, path: &Path) -> io::Result<Vec<SourceEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type()?.is_dir();
            entries.push(SourceEntry { name, is_dir });
        }
        entries.sort();
        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Filesystem loader: namespace → directories
#[derive(Debug, Clone, Default)]
pub struct PathMap {
    paths: HashMap<Namespace, Vec<PathBuf>>,
}

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `namespace` to an additional directory
    pub fn add(&mut self, namespace: impl Into<Namespace>, path: impl Into<PathBuf>) -> &mut Self {
        let path = path.into();
        let paths = self.paths.entry(namespace.into()).or_default();
        if !paths.contains(&path) {
            paths.push(path);
        }
        self
    }

    /// Builder form of `add`
    pub fn with(mut self, namespace: impl Into<Namespace>, path: impl Into<PathBuf>) -> Self {
        self.add(namespace, path);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<N, P, I> FromIterator<(N, I)> for PathMap
where
    N: Into<Namespace>,
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut map = PathMap::new();
        for (namespace, paths) in iter {
            let namespace = namespace.into();
            for path in paths {
                map.add(namespace.clone(), path);
            }
        }
        map
    }
}

impl SourceLoader for PathMap {
    fn namespace_paths(&self, namespace: &Namespace) -> Vec<PathBuf> {
        self.paths.get(namespace).cloned().unwrap_or_default()
    }
}

/// Virtual source tree derived from catalog type references.
///
/// `app::commands::cache::ClearCommand` appears as the file
/// `app/commands/cache/clear_command.<ext>`; namespace `app::` resolves to
/// the virtual directory `app`.
#[derive(Debug, Clone)]
pub struct CatalogTree {
    /// (directory segments, file name) per registered type
    units: Vec<(Vec<String>, String)>,
}

impl CatalogTree {
    pub fn new(catalog: &Catalog, extension: Option<&str>) -> Self {
        let units = catalog
            .type_refs()
            .map(|type_ref| {
                let mut segments: Vec<String> = type_ref
                    .split(SEPARATOR)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                let type_name = segments.pop().unwrap_or_default();
                let stem = inflector::underscore(&type_name);
                let file = match extension {
                    Some(ext) if !ext.is_empty() => format!("{}.{}", stem, ext),
                    _ => stem,
                };
                (segments, file)
            })
            .collect();
        Self { units }
    }

    fn segments_of(path: &Path) -> Vec<String> {
        path.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }

    fn covers(&self, dir: &[String]) -> bool {
        self.units
            .iter()
            .any(|(segments, _)| segments.len() >= dir.len() && segments[..dir.len()] == *dir)
    }
}

impl SourceLoader for CatalogTree {
    fn namespace_paths(&self, namespace: &Namespace) -> Vec<PathBuf> {
        let dir: Vec<String> = namespace.segments().iter().map(|s| s.to_string()).collect();
        if self.covers(&dir) {
            vec![dir.iter().collect()]
        } else {
            Vec::new()
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<SourceEntry>> {
        let dir = Self::segments_of(path);
        if !self.covers(&dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no catalog entries under {}", path.display()),
            ));
        }

        let mut entries = BTreeSet::new();
        for (segments, file) in &self.units {
            if segments.len() < dir.len() || segments[..dir.len()] != *dir {
                continue;
            }
            match segments.get(dir.len()) {
                Some(child) => entries.insert(SourceEntry::dir(child.clone())),
                None => entries.insert(SourceEntry::file(file.clone())),
            };
        }
        Ok(entries.into_iter().collect())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.covers(&Self::segments_of(path))
    }
}
