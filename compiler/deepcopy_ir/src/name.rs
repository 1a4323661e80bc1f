//! Package-qualified type names.

use std::fmt;

/// A type name together with the import path of its package.
///
/// Predeclared types use an empty package path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub package: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Name of a predeclared type.
    pub fn predeclared(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    /// Parse a fully-qualified name of the form `<import path>.<Ident>`.
    ///
    /// The split happens at the first `.` after the last `/`, so import
    /// paths containing dots (`k8s.io/api/core/v1.Pod`) resolve correctly.
    /// Returns `None` if either half is empty or the name is not an
    /// identifier.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let last_segment = text.rfind('/').map_or(0, |slash| slash + 1);
        let dot = last_segment + text[last_segment..].find('.')?;
        let (package, name) = (&text[..dot], &text[dot + 1..]);
        if package.is_empty() || !is_identifier(name) {
            return None;
        }
        Some(Self::new(package, name))
    }

    pub fn is_predeclared(&self) -> bool {
        self.package.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// Check whether `s` is a valid Go identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
