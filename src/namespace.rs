//! Namespace roots
//!
//! A namespace is a logical root such as `app::commands`. Roots are stored
//! in canonical form: no leading separator, exactly one trailing `::`. The
//! empty namespace is `::`.

use std::fmt;

/// Canonical namespace separator
pub const SEPARATOR: &str = "::";

/// A normalized namespace root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Normalize any of `app::commands`, `\App\Commands\` or `app/commands/`
    pub fn new(raw: &str) -> Self {
        let segments = split_segments(raw);
        if segments.is_empty() {
            return Namespace(SEPARATOR.to_string());
        }
        Namespace(format!("{}{}", segments.join(SEPARATOR), SEPARATOR))
    }

    /// Canonical string form (always ends with `::`)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, outermost first. Empty for the root namespace.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
    }

    /// Whether this is the empty namespace
    pub fn is_root(&self) -> bool {
        self.0 == SEPARATOR
    }

    /// Build a namespace from already-split segments
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let joined: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
        Namespace::new(&joined.join(SEPARATOR))
    }

    /// Fully-qualified type reference for `name` inside this namespace
    pub fn qualify(&self, name: &str) -> String {
        if self.is_root() {
            name.to_string()
        } else {
            format!("{}{}", self.0, name)
        }
    }

    /// Ancestor decomposition used by discovery.
    ///
    /// For `a::b::c` yields `(a::b::c::, [])`, `(a::b::, [c])`, `(a::, [b, c])`.
    /// The root namespace yields a single `(::, [])`.
    pub fn decompose(&self) -> Vec<(Namespace, Vec<String>)> {
        let segments = self.segments();
        if segments.is_empty() {
            return vec![(self.clone(), Vec::new())];
        }

        (1..=segments.len())
            .rev()
            .map(|keep| {
                let head = Namespace::from_segments(&segments[..keep]);
                let tail = segments[keep..].iter().map(|s| s.to_string()).collect();
                (head, tail)
            })
            .collect()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(raw: &str) -> Self {
        Namespace::new(raw)
    }
}

impl From<String> for Namespace {
    fn from(raw: String) -> Self {
        Namespace::new(&raw)
    }
}

fn split_segments(raw: &str) -> Vec<String> {
    raw.replace('\\', SEPARATOR)
        .replace('/', SEPARATOR)
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered, deduplicated set of namespace roots
///
/// Insertion order is discovery order. Mutations report whether anything
/// changed so the owner can invalidate derived state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceSet {
    roots: Vec<Namespace>,
}

impl NamespaceSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a namespace if absent. Returns true when it was added.
    pub fn add(&mut self, namespace: impl Into<Namespace>) -> bool {
        let namespace = namespace.into();
        if self.roots.contains(&namespace) {
            return false;
        }
        self.roots.push(namespace);
        true
    }

    /// Remove a namespace. Returns true when it was present.
    pub fn remove(&mut self, namespace: impl Into<Namespace>) -> bool {
        let namespace = namespace.into();
        match self.roots.iter().position(|ns| *ns == namespace) {
            Some(index) => {
                self.roots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Normalized membership test
    pub fn has(&self, namespace: impl Into<Namespace>) -> bool {
        self.roots.contains(&namespace.into())
    }

    /// Roots in insertion order
    pub fn list(&self) -> &[Namespace] {
        &self.roots
    }

    /// Remove every root
    pub fn clear(&mut self) {
        self.roots.clear();
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_forms_are_equal() {
        let a = Namespace::new("app::commands");
        let b = Namespace::new("::app::commands::");
        let c = Namespace::new("\\App\\Commands\\");
        let d = Namespace::new("app/commands");

        assert_eq!(a.as_str(), "app::commands::");
        assert_eq!(a, b);
        assert_eq!(a, d);
        // Case is preserved; only separators are canonicalized
        assert_eq!(c.as_str(), "App::Commands::");
    }

    #[test]
    fn test_empty_namespace_is_root() {
        assert_eq!(Namespace::new("").as_str(), "::");
        assert_eq!(Namespace::new("\\").as_str(), "::");
        assert!(Namespace::new("::").is_root());
    }

    #[test]
    fn test_qualify() {
        assert_eq!(
            Namespace::new("tests::mock").qualify("ArgumentsCommand"),
            "tests::mock::ArgumentsCommand"
        );
        assert_eq!(Namespace::new("").qualify("TestCommand"), "TestCommand");
    }

    #[test]
    fn test_decompose_keeps_segment_order() {
        let parts = Namespace::new("a::b::c").decompose();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].0.as_str(), "a::b::c::");
        assert!(parts[0].1.is_empty());
        assert_eq!(parts[1].0.as_str(), "a::b::");
        assert_eq!(parts[1].1, vec!["c"]);
        assert_eq!(parts[2].0.as_str(), "a::");
        assert_eq!(parts[2].1, vec!["b", "c"]);
    }

    #[test]
    fn test_decompose_root() {
        let parts = Namespace::new("").decompose();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].0.is_root());
    }

    #[test]
    fn test_set_dedupes_and_keeps_order() {
        let mut set = NamespaceSet::new();
        assert!(set.add("b::ns"));
        assert!(set.add("a::ns"));
        assert!(!set.add("b::ns::"));

        let listed: Vec<&str> = set.list().iter().map(|ns| ns.as_str()).collect();
        assert_eq!(listed, vec!["b::ns::", "a::ns::"]);
    }

    #[test]
    fn test_set_remove_reports() {
        let mut set = NamespaceSet::new();
        set.add("tests::mock");
        assert!(set.has("tests::mock"));
        assert!(!set.remove("tests::invalid"));
        assert!(set.remove("tests\\mock"));
        assert!(!set.has("tests::mock"));
        assert!(set.is_empty());
    }
}
