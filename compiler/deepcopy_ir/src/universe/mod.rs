//! The universe: every package and type visible to one generation run.
//!
//! # Design
//!
//! - One arena of [`TypeNode`]s addressed by [`TypeId`]
//! - Predeclared types occupy the fixed indices defined on `TypeId`
//! - Anonymous shapes (`*T`, `[]T`, `map[K]V`, ...) are interned, so two
//!   structurally identical shapes share one id
//! - Declared types are registered per package in declaration order
//!
//! The universe is built once by the front-end (or [`crate::model`]) and is
//! read-only for the rest of the run.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use crate::{Field, Method, QualifiedName, Receiver, TypeId, TypeKind, TypeNode};

/// Index of a package in the universe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(u32);

impl PackageId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A Go package as seen by the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    /// Import path (`example.com/api/v1`).
    pub path: String,
    /// Package clause name (`v1`).
    pub name: String,
    /// Directory the sources live in, if the front-end knows it.
    pub dir: Option<String>,
    /// File-level comment lines of all files in the package.
    pub comments: Vec<String>,
    /// Declared types, in declaration order.
    pub types: Vec<TypeId>,
}

/// Structural key used to intern anonymous shapes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ShapeKey {
    Pointer(TypeId),
    Slice(TypeId),
    Array(u64, TypeId),
    Map(TypeId, TypeId),
    Chan(TypeId),
    Func(String),
    TypeParam(String),
    Struct(Vec<Field>),
}

/// Arena of all packages and types in a run.
#[derive(Clone, Debug)]
pub struct Universe {
    nodes: Vec<TypeNode>,
    packages: Vec<Package>,
    packages_by_path: FxHashMap<String, PackageId>,
    types_by_name: FxHashMap<QualifiedName, TypeId>,
    shapes: FxHashMap<ShapeKey, TypeId>,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    /// Create a universe containing only the predeclared types.
    pub fn new() -> Self {
        let mut universe = Self {
            nodes: Vec::with_capacity(256),
            packages: Vec::new(),
            packages_by_path: FxHashMap::default(),
            types_by_name: FxHashMap::default(),
            shapes: FxHashMap::default(),
        };

        for builtin in TypeId::BUILTIN_NAMES {
            universe.push_named(QualifiedName::predeclared(builtin), TypeKind::Builtin);
        }

        let error = universe.push_named(QualifiedName::predeclared("error"), TypeKind::Interface);
        universe.nodes[error.index()]
            .methods
            .push(Method::new("Error", Receiver::Value).with_results(vec![TypeId::STRING]));

        universe.push(TypeNode::anonymous(TypeKind::Interface));

        debug_assert_eq!(universe.nodes.len(), TypeId::PREDECLARED_COUNT as usize);
        universe
    }

    fn push(&mut self, node: TypeNode) -> TypeId {
        let raw = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        let id = TypeId::from_raw(raw);
        self.nodes.push(node);
        id
    }

    fn push_named(&mut self, name: QualifiedName, kind: TypeKind) -> TypeId {
        let id = self.push(TypeNode::named(name.clone(), kind));
        self.types_by_name.insert(name, id);
        id
    }

    fn intern(&mut self, key: ShapeKey, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.shapes.get(&key) {
            return id;
        }
        let id = self.push(TypeNode::anonymous(kind));
        self.shapes.insert(key, id);
        id
    }

    // === Packages ===

    /// Register a package, or return the existing one with this path.
    pub fn add_package(&mut self, path: impl Into<String>, name: impl Into<String>) -> PackageId {
        let path = path.into();
        if let Some(&id) = self.packages_by_path.get(&path) {
            return id;
        }
        let id = PackageId(u32::try_from(self.packages.len()).unwrap_or(u32::MAX));
        self.packages.push(Package {
            path: path.clone(),
            name: name.into(),
            dir: None,
            comments: Vec::new(),
            types: Vec::new(),
        });
        self.packages_by_path.insert(path, id);
        id
    }

    pub fn set_package_comments(&mut self, id: PackageId, comments: Vec<String>) {
        self.packages[id.index()].comments = comments;
    }

    pub fn set_package_dir(&mut self, id: PackageId, dir: impl Into<String>) {
        self.packages[id.index()].dir = Some(dir.into());
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn package_by_path(&self, path: &str) -> Option<PackageId> {
        self.packages_by_path.get(path).copied()
    }

    /// All packages in registration order.
    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, pkg)| (PackageId(u32::try_from(i).unwrap_or(u32::MAX)), pkg))
    }

    /// Package that declares `id`, if it is part of the universe.
    pub fn package_of(&self, id: TypeId) -> Option<PackageId> {
        let name = self.nodes[id.index()].name.as_ref()?;
        self.package_by_path(&name.package)
    }

    // === Declarations ===

    /// Declare a named type in `package`.
    ///
    /// The type starts out [`TypeKind::Unresolved`] until [`Self::define`]
    /// is called, so declarations can reference each other in any order.
    /// Declaring an existing name returns the existing id.
    pub fn declare(&mut self, package: PackageId, name: impl Into<String>) -> TypeId {
        let qualified = QualifiedName::new(self.packages[package.index()].path.clone(), name);
        if let Some(&id) = self.types_by_name.get(&qualified) {
            return id;
        }
        let id = self.push_named(qualified, TypeKind::Unresolved);
        self.packages[package.index()].types.push(id);
        id
    }

    /// Reference a named type from a package the front-end did not supply.
    pub fn reference_external(&mut self, name: QualifiedName) -> TypeId {
        if let Some(&id) = self.types_by_name.get(&name) {
            return id;
        }
        self.push_named(name, TypeKind::Unresolved)
    }

    /// Set the kind of a declared type.
    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        debug_assert!(
            self.nodes[id.index()].is_named() && !id.is_predeclared(),
            "only declared types can be defined"
        );
        self.nodes[id.index()].kind = kind;
    }

    pub fn set_comments(&mut self, id: TypeId, closest: Vec<String>, second_closest: Vec<String>) {
        let node = &mut self.nodes[id.index()];
        node.comments = closest;
        node.second_closest_comments = second_closest;
    }

    pub fn add_method(&mut self, id: TypeId, method: Method) {
        self.nodes[id.index()].methods.push(method);
    }

    pub fn set_type_params(&mut self, id: TypeId, params: Vec<String>) {
        self.nodes[id.index()].type_params = params;
    }

    // === Anonymous shapes ===

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(ShapeKey::Pointer(elem), TypeKind::Pointer { elem })
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.intern(ShapeKey::Slice(elem), TypeKind::Slice { elem })
    }

    pub fn array(&mut self, len: u64, elem: TypeId) -> TypeId {
        self.intern(ShapeKey::Array(len, elem), TypeKind::Array { len, elem })
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(ShapeKey::Map(key, value), TypeKind::Map { key, value })
    }

    pub fn chan(&mut self, elem: TypeId) -> TypeId {
        self.intern(ShapeKey::Chan(elem), TypeKind::Chan { elem })
    }

    pub fn func(&mut self, signature: impl Into<String>) -> TypeId {
        let signature = signature.into();
        self.intern(
            ShapeKey::Func(signature.clone()),
            TypeKind::Func { signature },
        )
    }

    pub fn type_param(&mut self, name: impl Into<String>) -> TypeId {
        let name = name.into();
        self.intern(
            ShapeKey::TypeParam(name.clone()),
            TypeKind::TypeParam { name },
        )
    }

    /// Intern an anonymous struct literal type.
    pub fn anonymous_struct(&mut self, fields: Vec<Field>) -> TypeId {
        self.intern(
            ShapeKey::Struct(fields.clone()),
            TypeKind::Struct { fields },
        )
    }

    // === Queries ===

    pub fn node(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.nodes[id.index()].kind
    }

    pub fn name(&self, id: TypeId) -> Option<&QualifiedName> {
        self.nodes[id.index()].name.as_ref()
    }

    pub fn lookup(&self, name: &QualifiedName) -> Option<TypeId> {
        self.types_by_name.get(name).copied()
    }

    /// Number of types in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow alias declarations down to the first non-alias type.
    ///
    /// Alias cycles (which the Go compiler rejects) stop at the
    /// starting type.
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..self.nodes.len() {
            match self.kind(current) {
                TypeKind::Alias { underlying } => current = *underlying,
                _ => return current,
            }
        }
        id
    }

    /// Whether the type's values are copied by header (pointer, slice, map),
    /// looking through aliases.
    pub fn is_reference(&self, id: TypeId) -> bool {
        self.kind(self.underlying(id)).is_reference()
    }

    /// Whether the type's underlying shape is a struct.
    pub fn is_struct_like(&self, id: TypeId) -> bool {
        matches!(self.kind(self.underlying(id)), TypeKind::Struct { .. })
    }

    /// Fields of a struct-like type, or an empty slice.
    pub fn fields(&self, id: TypeId) -> &[Field] {
        match self.kind(self.underlying(id)) {
            TypeKind::Struct { fields } => fields,
            _ => &[],
        }
    }

    /// Fully-qualified Go spelling, for messages.
    pub fn display(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_display(&mut out, id);
        out
    }

    fn write_display(&self, out: &mut String, id: TypeId) {
        let node = self.node(id);
        if let Some(name) = &node.name {
            let _ = write!(out, "{name}");
            return;
        }
        match &node.kind {
            TypeKind::Pointer { elem } => {
                out.push('*');
                self.write_display(out, *elem);
            }
            TypeKind::Slice { elem } => {
                out.push_str("[]");
                self.write_display(out, *elem);
            }
            TypeKind::Array { len, elem } => {
                let _ = write!(out, "[{len}]");
                self.write_display(out, *elem);
            }
            TypeKind::Map { key, value } => {
                out.push_str("map[");
                self.write_display(out, *key);
                out.push(']');
                self.write_display(out, *value);
            }
            TypeKind::Chan { elem } => {
                out.push_str("chan ");
                self.write_display(out, *elem);
            }
            TypeKind::Struct { fields } => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    out.push_str(if i == 0 { " " } else { "; " });
                    if !field.is_embedded() {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_display(out, field.ty);
                }
                out.push_str(if fields.is_empty() { "}" } else { " }" });
            }
            TypeKind::Interface => out.push_str("interface{}"),
            TypeKind::TypeParam { name } => out.push_str(name),
            TypeKind::Func { signature } => out.push_str(signature),
            TypeKind::Builtin | TypeKind::Alias { .. } | TypeKind::Unresolved => {
                out.push_str("<unknown>");
            }
        }
    }
}

#[cfg(test)]
mod tests;
