//! Application state for the Attendance Reconciliation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::PolicyLoader;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// currently the loaded attendance policy. The policy is read-only after
/// startup, so concurrent requests share one `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The loaded attendance policy.
    policy: Arc<PolicyLoader>,
}

impl AppState {
    /// Creates a new application state with the given policy loader.
    pub fn new(policy: PolicyLoader) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Returns a reference to the policy loader.
    pub fn policy(&self) -> &PolicyLoader {
        &self.policy
    }
}
