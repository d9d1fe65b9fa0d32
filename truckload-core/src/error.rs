//! The core's entire error vocabulary (spec.md §7).
//!
//! Modeled on `coreba::helpe::JobError`: a `thiserror`-derived struct
//! carrying both a human message and the offending value.

use thiserror::Error;

/// A single precondition violation detected while validating input at the
/// boundary of `optimize`. The optimizer makes no attempt to repair a
/// violation and performs no placement when one is found.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid input at field `{field}`{}: {reason}", index.map(|i| format!(" (box index {i})")).unwrap_or_default())]
pub struct InvalidInput {
    pub field: &'static str,
    pub index: Option<usize>,
    pub reason: String,
}

impl InvalidInput {
    pub fn new(field: &'static str, index: Option<usize>, reason: impl Into<String>) -> Self {
        Self { field, index, reason: reason.into() }
    }
}

/// The boundary-validation error: one or more [`InvalidInput`] violations
/// were found. `optimize` never returns this for placement infeasibility
/// (that's a normal outcome, reported via `unplaced`) -- only for
/// malformed input.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} invalid input violation(s) found", .0.len())]
pub struct OptimizeError(pub Vec<InvalidInput>);

impl OptimizeError {
    pub fn violations(&self) -> &[InvalidInput] {
        &self.0
    }
}
