//! Tree configuration

use serde::{Deserialize, Serialize};

/// What happens to the tree when an update is rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Nothing is committed; tree and observer see no trace of the update
    #[default]
    Rollback,
    /// Mutations made before the failure was detected are committed, with
    /// their callbacks. A new root that never got installed is released
    /// again, and `on_atomic_update_finished` does not fire.
    KeepPartial,
}

/// Per-tree settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub failure_policy: FailurePolicy,
    /// Check structural invariants after every successful commit
    pub verify_invariants: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_verify_invariants(mut self, verify: bool) -> Self {
        self.verify_invariants = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_rollback() {
        let config = TreeConfig::default();
        assert_eq!(config.failure_policy, FailurePolicy::Rollback);
        assert_eq!(config.verify_invariants, cfg!(debug_assertions));
    }

    #[test]
    fn test_builders() {
        let config = TreeConfig::new()
            .with_failure_policy(FailurePolicy::KeepPartial)
            .with_verify_invariants(true);
        assert_eq!(config.failure_policy, FailurePolicy::KeepPartial);
        assert!(config.verify_invariants);
    }
}
