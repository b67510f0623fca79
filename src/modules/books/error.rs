use std::fmt;

use thiserror::Error;

/// Which side of the borrow/return cycle a rejected transition hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanConflict {
    AlreadyBorrowed,
    NotBorrowed,
}

impl fmt::Display for LoanConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanConflict::AlreadyBorrowed => f.write_str("is already borrowed"),
            LoanConflict::NotBorrowed => f.write_str("is not currently borrowed"),
        }
    }
}

/// Failures reported by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("required fields are missing or empty: {}", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("book with id {id} not found")]
    NotFound { id: String },

    #[error("book with id {id} {conflict}")]
    Conflict { id: String, conflict: LoanConflict },

    #[error("book with id {id} already exists")]
    DuplicateId { id: String },
}

impl CatalogError {
    pub fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    pub fn conflict(id: &str, conflict: LoanConflict) -> Self {
        Self::Conflict {
            id: id.to_string(),
            conflict,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
