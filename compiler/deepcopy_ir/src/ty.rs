//! Type nodes stored in the universe arena.

use bitflags::bitflags;

use crate::{QualifiedName, TypeId};

/// A single type: a named declaration or an anonymous shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeNode {
    /// `Some` for declared (and predeclared) types, `None` for anonymous shapes.
    pub name: Option<QualifiedName>,
    pub kind: TypeKind,
    /// Comment block directly above the declaration, without `//` markers.
    pub comments: Vec<String>,
    /// The comment block before that one, separated by a blank line.
    pub second_closest_comments: Vec<String>,
    /// Declared methods. For interfaces, the interface's method set.
    pub methods: Vec<Method>,
    /// Type parameter names of a generic declaration.
    pub type_params: Vec<String>,
}

impl TypeNode {
    pub(crate) fn anonymous(kind: TypeKind) -> Self {
        Self {
            name: None,
            kind,
            comments: Vec::new(),
            second_closest_comments: Vec::new(),
            methods: Vec::new(),
            type_params: Vec::new(),
        }
    }

    pub(crate) fn named(name: QualifiedName, kind: TypeKind) -> Self {
        Self {
            name: Some(name),
            ..Self::anonymous(kind)
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Look up a declared method by name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// All directive-bearing comment lines: second-closest block first.
    pub fn comment_lines(&self) -> impl Iterator<Item = &str> {
        self.second_closest_comments
            .iter()
            .chain(self.comments.iter())
            .map(String::as_str)
    }
}

/// The shape of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// A predeclared scalar (`int`, `string`, ...).
    Builtin,

    /// A struct with fields in declaration order.
    Struct { fields: Vec<Field> },

    /// A declared non-struct type (`type Labels map[string]string`).
    Alias { underlying: TypeId },

    Pointer { elem: TypeId },

    Slice { elem: TypeId },

    Array { len: u64, elem: TypeId },

    Map { key: TypeId, value: TypeId },

    /// An interface; its methods live on the node.
    Interface,

    /// A type parameter of a generic declaration.
    TypeParam { name: String },

    /// A function type, kept as its source spelling.
    Func { signature: String },

    Chan { elem: TypeId },

    /// A declared type the front-end could not resolve, or a
    /// declaration whose definition was never supplied.
    Unresolved,
}

impl TypeKind {
    /// Whether values of this kind are reference-like (copied by header).
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Self::Pointer { .. } | Self::Slice { .. } | Self::Map { .. }
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Struct { .. } => "struct",
            Self::Alias { .. } => "alias",
            Self::Pointer { .. } => "pointer",
            Self::Slice { .. } => "slice",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Interface => "interface",
            Self::TypeParam { .. } => "type parameter",
            Self::Func { .. } => "func",
            Self::Chan { .. } => "chan",
            Self::Unresolved => "unresolved",
        }
    }
}

bitflags! {
    /// Per-field attributes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// Embedded field; `name` is the type's short name.
        const EMBEDDED = 1 << 0;
    }
}

/// A struct field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub flags: FieldFlags,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            flags: FieldFlags::empty(),
        }
    }

    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.flags |= FieldFlags::EMBEDDED;
        self
    }

    pub fn is_embedded(&self) -> bool {
        self.flags.contains(FieldFlags::EMBEDDED)
    }
}

/// How a method receives its receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Receiver {
    Pointer,
    Value,
}

/// A declared method signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Method {
    pub name: String,
    pub receiver: Receiver,
    pub params: Vec<TypeId>,
    pub results: Vec<TypeId>,
}

impl Method {
    pub fn new(name: impl Into<String>, receiver: Receiver) -> Self {
        Self {
            name: name.into(),
            receiver,
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<TypeId>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_results(mut self, results: Vec<TypeId>) -> Self {
        self.results = results;
        self
    }
}
