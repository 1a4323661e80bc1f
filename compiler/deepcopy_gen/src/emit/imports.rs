//! Import aliases and Go type spelling.
//!
//! Every foreign package referenced by a generated file gets an explicit
//! alias. Aliases derive from the import path: the last segment, prefixed
//! with the one before it for version segments (`k8s.io/api/core/v1` becomes
//! `corev1`), stripped to alphanumerics. Collisions with other aliases,
//! Go keywords, identifiers used by the generated code and the file's own
//! type names take a numeric suffix.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use deepcopy_ir::{TypeId, TypeKind, Universe};
use rustc_hash::FxHashSet;

const GO_KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Identifiers the generated function bodies declare or call.
const GENERATED_IDENTS: [&str; 13] = [
    "in", "out", "key", "val", "i", "c", "clone", "cloned", "outVal", "make", "new", "len",
    "copy",
];

pub(crate) struct ImportTracker {
    local: String,
    /// Import path to alias, sorted by path for the import block.
    aliases: BTreeMap<String, String>,
    taken: FxHashSet<String>,
}

impl ImportTracker {
    /// Tracker for a file in package `local`, whose declared type names must
    /// stay unambiguous.
    pub(crate) fn new<'a>(local: &str, local_names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut taken: FxHashSet<String> = GO_KEYWORDS
            .iter()
            .chain(GENERATED_IDENTS.iter())
            .map(|s| (*s).to_string())
            .collect();
        taken.extend(local_names.into_iter().map(str::to_string));
        Self {
            local: local.to_string(),
            aliases: BTreeMap::new(),
            taken,
        }
    }

    /// Alias for `path`, registering the import on first use. `None` for
    /// the file's own package and for predeclared names.
    pub(crate) fn qualifier(&mut self, path: &str) -> Option<String> {
        if path.is_empty() || path == self.local {
            return None;
        }
        if let Some(alias) = self.aliases.get(path) {
            return Some(alias.clone());
        }
        let base = alias_base(path);
        let mut alias = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&alias) {
            alias = format!("{base}{suffix}");
            suffix += 1;
        }
        self.taken.insert(alias.clone());
        self.aliases.insert(path.to_string(), alias.clone());
        Some(alias)
    }

    /// Qualified spelling of `name` declared in `path`.
    pub(crate) fn qualify(&mut self, path: &str, name: &str) -> String {
        match self.qualifier(path) {
            Some(alias) => format!("{alias}.{name}"),
            None => name.to_string(),
        }
    }

    /// `(alias, path)` pairs in path order.
    pub(crate) fn imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(path, alias)| (alias.as_str(), path.as_str()))
    }

    /// Go spelling of `ty` as seen from the file's package.
    pub(crate) fn render(&mut self, universe: &Universe, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, universe, ty);
        out
    }

    fn write_type(&mut self, out: &mut String, universe: &Universe, ty: TypeId) {
        let node = universe.node(ty);
        if let Some(name) = &node.name {
            let spelled = self.qualify(&name.package, &name.name);
            out.push_str(&spelled);
            return;
        }
        match &node.kind {
            TypeKind::Pointer { elem } => {
                out.push('*');
                self.write_type(out, universe, *elem);
            }
            TypeKind::Slice { elem } => {
                out.push_str("[]");
                self.write_type(out, universe, *elem);
            }
            TypeKind::Array { len, elem } => {
                let _ = write!(out, "[{len}]");
                self.write_type(out, universe, *elem);
            }
            TypeKind::Map { key, value } => {
                out.push_str("map[");
                self.write_type(out, universe, *key);
                out.push(']');
                self.write_type(out, universe, *value);
            }
            TypeKind::Chan { elem } => {
                out.push_str("chan ");
                self.write_type(out, universe, *elem);
            }
            TypeKind::Struct { fields } => {
                out.push_str("struct {");
                for (i, field) in fields.iter().enumerate() {
                    out.push_str(if i == 0 { " " } else { "; " });
                    if !field.is_embedded() {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(out, universe, field.ty);
                }
                out.push_str(if fields.is_empty() { "}" } else { " }" });
            }
            TypeKind::Interface => out.push_str("interface{}"),
            TypeKind::TypeParam { name } => out.push_str(name),
            TypeKind::Func { signature } => out.push_str(signature),
            TypeKind::Builtin | TypeKind::Alias { .. } | TypeKind::Unresolved => {}
        }
    }
}

fn alias_base(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    let is_version = last.len() > 1
        && last.starts_with('v')
        && last[1..].chars().all(|c| c.is_ascii_digit());
    let raw = match segments.next() {
        Some(parent) if is_version => format!("{parent}{last}"),
        _ => last.to_string(),
    };
    let alias: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    if alias.starts_with(|c: char| c.is_ascii_digit()) || alias.is_empty() {
        format!("pkg{alias}")
    } else {
        alias
    }
}
