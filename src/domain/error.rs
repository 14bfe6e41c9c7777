//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::CategoryPath;

/// Domain errors represent violations of the draw rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid count at {path}: expected a non-negative integer, found {found}")]
    InvalidCount { path: CategoryPath, found: String },

    #[error("invalid item list at {path}: {message}")]
    InvalidItems { path: CategoryPath, message: String },

    #[error("duplicate item '{item}' at {path}")]
    DuplicateItem { path: CategoryPath, item: String },

    #[error("no eligible items for {path}")]
    MissingItems { path: CategoryPath },

    #[error("expected a list of items at {path}, found a category")]
    NotALeaf { path: CategoryPath },

    #[error("expected a category at {path}, found a leaf")]
    NotACategory { path: CategoryPath },

    #[error("cannot draw {requested} items at {path}: only {available} eligible")]
    OverDraw {
        path: CategoryPath,
        requested: u32,
        available: usize,
    },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
