//! Directive comments.
//!
//! Directives are comment lines of the form `+key=value` (or bare `+key`).
//! Package directives come from the file-level comments of a package; type
//! directives from the two comment blocks above a declaration. They are
//! parsed once here into a [`GenerationPolicy`]; nothing downstream looks at
//! comment text again.

use std::collections::BTreeMap;

use deepcopy_ir::{PackageId, QualifiedName, TypeId, Universe};
use tracing::warn;

use crate::GenError;

/// Enables generation: `package` on a package, `true`/`false` on a type.
pub const ENABLED_TAG: &str = "k8s:deepcopy-gen";

/// Extra `DeepCopy<Name>` methods returning the listed interfaces.
pub const INTERFACES_TAG: &str = "k8s:deepcopy-gen:interfaces";

/// Value receivers for the interface methods.
pub const NONPOINTER_TAG: &str = "k8s:deepcopy-gen:nonpointer-interfaces";

/// Directive values keyed by directive name, in comment order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentTags {
    tags: BTreeMap<String, Vec<String>>,
}

impl CommentTags {
    pub fn extract<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for line in lines {
            let line = line.trim();
            let line = line.strip_prefix("//").unwrap_or(line).trim_start();
            let Some(body) = line.strip_prefix('+') else {
                continue;
            };
            let (key, value) = body.split_once('=').unwrap_or((body, ""));
            tags.entry(key.trim().to_string())
                .or_default()
                .push(value.trim().to_string());
        }
        Self { tags }
    }

    /// Values of `key`, empty if the directive is absent.
    pub fn values(&self, key: &str) -> &[String] {
        self.tags.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether any deep-copy directive is present.
    pub fn mentions_generator(&self) -> bool {
        self.tags.keys().any(|key| key.starts_with(ENABLED_TAG))
    }
}

/// Receiver of the generated `DeepCopy<Name>` interface methods.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterfaceReceiver {
    #[default]
    Pointer,
    Value,
}

/// Resolved directives of one type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Whether copy methods are generated for the type.
    pub enabled: bool,
    /// Type-level `true`/`false`, if given.
    pub explicit: Option<bool>,
    /// Requested interfaces, deduplicated and sorted.
    pub interfaces: Vec<QualifiedName>,
    pub receiver: InterfaceReceiver,
}

impl GenerationPolicy {
    /// The type carries an explicit `=false`.
    pub fn is_opted_out(&self) -> bool {
        self.explicit == Some(false)
    }
}

/// Resolve the package-level default from file comments.
pub fn package_default<'a>(
    package: &str,
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<bool, GenError> {
    let tags = CommentTags::extract(lines);
    let values = tags.values(ENABLED_TAG);
    let error = |message: String| GenError::DirectiveSyntax {
        subject: package.to_string(),
        message,
    };

    match values {
        [] => Ok(false),
        [value] => {
            let mut parts = value.split(',').map(str::trim);
            match (parts.next(), parts.next(), parts.next()) {
                (Some("package"), None, _) => Ok(true),
                (Some("package"), Some("register"), None) => {
                    warn!(package, "+{ENABLED_TAG}=package,register: `register` is ignored");
                    Ok(true)
                }
                _ => Err(error(format!(
                    "unsupported package-level +{ENABLED_TAG} value {value:?}"
                ))),
            }
        }
        _ => Err(error(format!(
            "+{ENABLED_TAG} appears {} times in package comments",
            values.len()
        ))),
    }
}

/// Resolve the policy of a declared type.
pub fn type_policy(
    universe: &Universe,
    ty: TypeId,
    package_default: bool,
) -> Result<GenerationPolicy, GenError> {
    let node = universe.node(ty);
    let subject = universe.display(ty);
    let error = |message: String| GenError::DirectiveSyntax {
        subject: subject.clone(),
        message,
    };
    let tags = CommentTags::extract(node.comment_lines());

    let explicit = match tags.values(ENABLED_TAG) {
        [] => None,
        [value] => match value.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                return Err(error(format!(
                    "unsupported +{ENABLED_TAG} value {other:?}, expected true or false"
                )));
            }
        },
        values => {
            return Err(error(format!(
                "+{ENABLED_TAG} appears {} times",
                values.len()
            )));
        }
    };

    let mut interfaces = parse_interfaces(tags.values(INTERFACES_TAG)).map_err(error)?;
    let receiver = parse_receiver(tags.values(NONPOINTER_TAG)).map_err(error)?;

    // The package default only covers exported declarations.
    let exported = node
        .name
        .as_ref()
        .and_then(|name| name.name.chars().next())
        .is_some_and(char::is_uppercase);
    let enabled = explicit.unwrap_or(package_default && exported);

    if !interfaces.is_empty() && !universe.is_struct_like(ty) {
        warn!(
            ty = %subject,
            "+{INTERFACES_TAG} is only supported on struct types, ignoring"
        );
        interfaces.clear();
    }

    Ok(GenerationPolicy {
        enabled,
        explicit,
        interfaces,
        receiver,
    })
}

fn parse_interfaces(values: &[String]) -> Result<Vec<QualifiedName>, String> {
    let mut interfaces = Vec::new();
    for entry in values.iter().flat_map(|v| v.split(',')).map(str::trim) {
        if entry.is_empty() {
            continue;
        }
        let name = QualifiedName::parse(entry).ok_or_else(|| {
            format!(
                "invalid interface {entry:?} in +{INTERFACES_TAG}, \
                 expected <import path>.<Name>"
            )
        })?;
        interfaces.push(name);
    }
    interfaces.sort();
    interfaces.dedup();

    let mut short_names: BTreeMap<&str, &QualifiedName> = BTreeMap::new();
    for iface in &interfaces {
        if let Some(previous) = short_names.insert(&iface.name, iface) {
            return Err(format!(
                "interfaces {previous} and {iface} would both generate DeepCopy{}",
                iface.name
            ));
        }
    }
    Ok(interfaces)
}

fn parse_receiver(values: &[String]) -> Result<InterfaceReceiver, String> {
    let mut receiver = None;
    for value in values {
        let parsed = match value.as_str() {
            "true" => InterfaceReceiver::Value,
            "false" => InterfaceReceiver::Pointer,
            other => {
                return Err(format!(
                    "unsupported +{NONPOINTER_TAG} value {other:?}, expected true or false"
                ));
            }
        };
        if receiver.is_some_and(|r| r != parsed) {
            return Err(format!("contradicting +{NONPOINTER_TAG} values"));
        }
        receiver = Some(parsed);
    }
    Ok(receiver.unwrap_or_default())
}

/// Whether a package or any of its types mentions a deep-copy directive.
pub fn has_directives(universe: &Universe, package: PackageId) -> bool {
    let pkg = universe.package(package);
    CommentTags::extract(pkg.comments.iter().map(String::as_str)).mentions_generator()
        || pkg
            .types
            .iter()
            .any(|&ty| CommentTags::extract(universe.node(ty).comment_lines()).mentions_generator())
}

#[cfg(test)]
mod tests;
