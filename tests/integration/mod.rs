//! Integration tests for unfurl

mod reconcile_policies;
mod test_utils;
mod walker_completeness;
