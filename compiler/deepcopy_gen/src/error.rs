//! Generation errors.
//!
//! Every error is fatal for the package it is attributed to. Messages name
//! the package (through the qualified type name) and the field or interface
//! at fault.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenError {
    /// Malformed or conflicting directive comments. `subject` is the package
    /// path, or the qualified type name for type-level directives.
    #[error("{subject}: {message}")]
    DirectiveSyntax { subject: String, message: String },

    /// A dependency cycle through values held directly (not behind a
    /// pointer, slice or map).
    #[error("{package}: dependency cycle through direct values: {}", .path.join(" -> "))]
    Cycle { package: String, path: Vec<String> },

    /// No copy strategy exists for a field type.
    #[error("{ty}: field {field}: {reason}")]
    UnresolvedType {
        ty: String,
        field: String,
        reason: String,
    },

    /// An interface field whose interface does not declare its deep-copy method.
    #[error("{ty}: field {field}: interface {interface} does not declare {method}()")]
    MissingInterfaceMethod {
        ty: String,
        field: String,
        interface: String,
        method: String,
    },

    /// A hand-written copy method with an unusable signature.
    #[error("{ty}: method {method}: {reason}")]
    MethodSignature {
        ty: String,
        method: String,
        reason: String,
    },

    /// A type whose copy code calls methods of a type from a package that
    /// failed, so those methods will not exist.
    #[error("{ty}: depends on {dependency}, whose package {package} failed")]
    DependencyFailed {
        ty: String,
        dependency: String,
        package: String,
    },

    #[error("package {package} is not part of the model")]
    UnknownPackage { package: String },
}

/// A package whose generation was aborted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageFailure {
    pub package: String,
    pub error: GenError,
}
