//! Type model for the deep-copy generator.
//!
//! This crate holds the abstract view of Go packages the generator works on:
//! packages with their comments, declared types with fields and methods, and
//! the anonymous shapes those declarations use. It knows nothing about
//! directives or copy strategies.
//!
//! - [`Universe`]: arena of every [`TypeNode`] in a run, addressed by [`TypeId`]
//! - [`texpr`]: parser for Go type expressions
//! - [`model`]: JSON interchange form a front-end hands over

mod error;
mod idx;
pub mod model;
mod name;
pub mod texpr;
mod ty;
mod universe;

pub use error::ModelError;
pub use idx::TypeId;
pub use model::{build_universe, load_model};
pub use name::{is_identifier, QualifiedName};
pub use ty::{Field, FieldFlags, Method, Receiver, TypeKind, TypeNode};
pub use universe::{Package, PackageId, Universe};
