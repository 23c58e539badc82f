//! Static route table.
//!
//! The table is plain data: an ordered `'static` slice of (path, name, view)
//! entries chosen once at startup. The web shell hands the current pathname to
//! [`RouteTable::resolve`] and renders whichever [`ViewKind`] comes back.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The pages the shell knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Home,
    Connection,
    Convert,
}

impl ViewKind {
    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Home => "Home",
            ViewKind::Connection => "Connection",
            ViewKind::Convert => "Convert",
        }
    }

    pub fn all() -> &'static [ViewKind] {
        &[ViewKind::Home, ViewKind::Connection, ViewKind::Convert]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub name: &'static str,
    pub view: ViewKind,
}

/// Which of the two known route tables to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteSet {
    /// `/`, `/connection`, `/convert`.
    #[default]
    Full,
    /// `/`, `/connection`.
    WithoutConvert,
}

impl RouteSet {
    pub fn label(self) -> &'static str {
        match self {
            RouteSet::Full => "full",
            RouteSet::WithoutConvert => "without-convert",
        }
    }
}

impl fmt::Display for RouteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RouteSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(RouteSet::Full),
            "without-convert" | "without_convert" | "minimal" => Ok(RouteSet::WithoutConvert),
            _ => Err(ConfigError::UnknownRouteSet(s.to_string())),
        }
    }
}

const HOME: RouteEntry = RouteEntry {
    path: "/",
    name: "home",
    view: ViewKind::Home,
};

const CONNECTION: RouteEntry = RouteEntry {
    path: "/connection",
    name: "connection",
    view: ViewKind::Connection,
};

const CONVERT: RouteEntry = RouteEntry {
    path: "/convert",
    name: "convert",
    view: ViewKind::Convert,
};

static FULL_ROUTES: [RouteEntry; 3] = [HOME, CONNECTION, CONVERT];
static WITHOUT_CONVERT_ROUTES: [RouteEntry; 2] = [HOME, CONNECTION];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTable {
    set: RouteSet,
    entries: &'static [RouteEntry],
}

impl RouteTable {
    pub fn new(set: RouteSet) -> Self {
        let entries: &'static [RouteEntry] = match set {
            RouteSet::Full => &FULL_ROUTES,
            RouteSet::WithoutConvert => &WITHOUT_CONVERT_ROUTES,
        };
        Self { set, entries }
    }

    pub fn set(&self) -> RouteSet {
        self.set
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &'static [RouteEntry] {
        self.entries
    }

    /// The `/` entry, rendered when the app first loads.
    pub fn home(&self) -> &'static RouteEntry {
        // Both tables start with HOME.
        &self.entries[0]
    }

    pub fn by_name(&self, name: &str) -> Option<&'static RouteEntry> {
        self.entries.iter().find(|r| r.name == name)
    }

    pub fn for_view(&self, view: ViewKind) -> Option<&'static RouteEntry> {
        self.entries.iter().find(|r| r.view == view)
    }

    pub fn contains_view(&self, view: ViewKind) -> bool {
        self.for_view(view).is_some()
    }

    /// Browser-facing href for a route name, prefixed with `base_path`.
    pub fn href(&self, name: &str, base_path: &str) -> Option<String> {
        self.by_name(name).map(|r| join_base(base_path, r.path))
    }

    /// Finds the entry for a browser pathname.
    ///
    /// `base_path` is stripped first. An empty remainder means `/`, a single
    /// trailing slash is ignored and matching is ASCII case-insensitive.
    pub fn resolve(&self, pathname: &str, base_path: &str) -> Option<&'static RouteEntry> {
        let path = strip_base(pathname, base_path)?;
        let path = match path {
            "" => "/",
            p if p.len() > 1 => p.strip_suffix('/').unwrap_or(p),
            p => p,
        };

        let found = self
            .entries
            .iter()
            .find(|r| r.path.eq_ignore_ascii_case(path));
        tracing::debug!(pathname, resolved = ?found.map(|r| r.name), "route lookup");
        found
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(RouteSet::default())
    }
}

fn strip_base<'a>(pathname: &'a str, base_path: &str) -> Option<&'a str> {
    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        return Some(pathname);
    }

    let rest = pathname.strip_prefix(base)?;
    // "/app" must not match "/application".
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

fn join_base(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        return path.to_string();
    }
    if path == "/" {
        format!("{base}/")
    } else {
        format!("{base}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both() -> [RouteTable; 2] {
        [
            RouteTable::new(RouteSet::Full),
            RouteTable::new(RouteSet::WithoutConvert),
        ]
    }

    #[test]
    fn route_inventory_is_stable() {
        for table in both() {
            let mut paths: Vec<&str> = table.entries().iter().map(|r| r.path).collect();
            let mut names: Vec<&str> = table.entries().iter().map(|r| r.name).collect();
            let n = paths.len();
            paths.sort_unstable();
            paths.dedup();
            names.sort_unstable();
            names.dedup();
            assert_eq!(paths.len(), n, "duplicate path in {}", table.set());
            assert_eq!(names.len(), n, "duplicate name in {}", table.set());
        }
    }

    #[test]
    fn exactly_one_root_route_and_it_is_home() {
        for table in both() {
            let roots = table.entries().iter().filter(|r| r.path == "/").count();
            assert_eq!(roots, 1);
            assert_eq!(table.home().path, "/");
            assert_eq!(table.home().view, ViewKind::Home);
            assert_eq!(table.resolve("/", "/"), Some(table.home()));
        }
    }

    #[test]
    fn each_path_resolves_to_a_distinct_view() {
        for table in both() {
            let mut views = Vec::new();
            for entry in table.entries() {
                let found = table.resolve(entry.path, "/").expect("declared path resolves");
                assert_eq!(found, entry);
                assert!(!views.contains(&found.view));
                views.push(found.view);
            }
        }
    }

    #[test]
    fn full_table_declares_convert_and_minimal_does_not() {
        let full = RouteTable::new(RouteSet::Full);
        let paths: Vec<&str> = full.entries().iter().map(|r| r.path).collect();
        assert_eq!(paths, ["/", "/connection", "/convert"]);

        let minimal = RouteTable::new(RouteSet::WithoutConvert);
        assert_eq!(minimal.entries().len(), 2);
        assert!(minimal.resolve("/convert", "/").is_none());
        assert!(!minimal.contains_view(ViewKind::Convert));
        assert!(minimal.by_name("convert").is_none());
    }

    #[test]
    fn resolve_tolerates_trailing_slash_and_case() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/connection/", "/").map(|r| r.name), Some("connection"));
        assert_eq!(table.resolve("/Convert", "/").map(|r| r.name), Some("convert"));
        assert_eq!(table.resolve("", "/").map(|r| r.name), Some("home"));
        assert!(table.resolve("/connection//", "/").is_none());
        assert!(table.resolve("/nope", "/").is_none());
    }

    #[test]
    fn resolve_strips_base_path() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/d2j", "/d2j").map(|r| r.name), Some("home"));
        assert_eq!(table.resolve("/d2j/", "/d2j/").map(|r| r.name), Some("home"));
        assert_eq!(
            table.resolve("/d2j/convert", "/d2j").map(|r| r.name),
            Some("convert")
        );
        assert!(table.resolve("/d2jx/convert", "/d2j").is_none());
        assert!(table.resolve("/convert", "/d2j").is_none());
    }

    #[test]
    fn href_prefixes_base_path() {
        let table = RouteTable::default();
        assert_eq!(table.href("home", "/").as_deref(), Some("/"));
        assert_eq!(table.href("convert", "/").as_deref(), Some("/convert"));
        assert_eq!(table.href("home", "/d2j").as_deref(), Some("/d2j/"));
        assert_eq!(table.href("connection", "/d2j/").as_deref(), Some("/d2j/connection"));
        assert_eq!(table.href("missing", "/"), None);
    }

    #[test]
    fn route_set_parses_from_config_values() {
        assert_eq!("full".parse::<RouteSet>(), Ok(RouteSet::Full));
        assert_eq!(" Without-Convert ".parse::<RouteSet>(), Ok(RouteSet::WithoutConvert));
        assert_eq!("minimal".parse::<RouteSet>(), Ok(RouteSet::WithoutConvert));
        assert!(matches!(
            "everything".parse::<RouteSet>(),
            Err(ConfigError::UnknownRouteSet(_))
        ));
        for set in [RouteSet::Full, RouteSet::WithoutConvert] {
            assert_eq!(set.to_string().parse::<RouteSet>(), Ok(set));
        }
    }

    #[test]
    fn every_view_has_a_title() {
        for v in ViewKind::all() {
            assert!(!v.title().trim().is_empty());
        }
        assert!(ViewKind::all()
            .iter()
            .all(|v| RouteTable::new(RouteSet::Full).contains_view(*v)));
    }
}
