//! Errors raised while building a universe from the interchange model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{package}: invalid type expression `{expr}` at offset {offset}: {message}")]
    TypeExpr {
        package: String,
        expr: String,
        offset: usize,
        message: String,
    },

    #[error("{package}: type `{name}` referenced from `{context}` is not declared")]
    UnknownType {
        package: String,
        name: String,
        context: String,
    },

    #[error("{package}: type `{name}` is declared more than once")]
    DuplicateType { package: String, name: String },

    #[error("{package}.{name}: alias declaration has no underlying type")]
    MissingUnderlying { package: String, name: String },

    #[error("invalid declaration `{name}` in package `{package}`: {reason}")]
    InvalidDeclaration {
        package: String,
        name: String,
        reason: String,
    },
}
