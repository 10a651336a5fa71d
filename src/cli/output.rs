//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, ReconcileError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Reconcile(ReconcileError::AmbiguousExistence { .. }) => format!(
            "error: {}\nhint: the destination could not be inspected; check its permissions",
            e
        ),
        ApiError::Reconcile(inner) if inner.path().is_some() => format!(
            "error: {}\nnote: files written before the failure were left in place",
            e
        ),
        _ => format!("error: {}", e),
    }
}
