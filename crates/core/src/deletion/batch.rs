//! Batch delete outcomes.

use serde::Serialize;

/// Result of deleting one id in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchDeleteOutcome {
    /// Requested id.
    pub id: i32,
    /// Whether the delete went through.
    pub success: bool,
    /// Human message.
    pub message: String,
    /// Recycle-bin key on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_key: Option<String>,
    /// Blocker messages on refusal.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<String>,
}

impl BatchDeleteOutcome {
    /// A successful delete.
    #[must_use]
    pub fn deleted(id: i32, deletion_key: String) -> Self {
        Self {
            id,
            success: true,
            message: "Deleted".to_string(),
            deletion_key: Some(deletion_key),
            blockers: Vec::new(),
        }
    }

    /// A failed delete.
    #[must_use]
    pub fn failed(id: i32, message: impl Into<String>, blockers: Vec<String>) -> Self {
        Self {
            id,
            success: false,
            message: message.into(),
            deletion_key: None,
            blockers,
        }
    }
}

/// Overall state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every id deleted.
    AllSucceeded,
    /// Some deleted, some refused.
    Partial,
    /// Nothing deleted.
    AllFailed,
}

/// Aggregate of a batch delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchDeleteSummary {
    /// Ids deleted.
    pub succeeded: usize,
    /// Ids refused or missing.
    pub failed: usize,
    /// Per-id outcomes in request order.
    pub results: Vec<BatchDeleteOutcome>,
}

impl BatchDeleteSummary {
    /// Summarizes per-id outcomes.
    #[must_use]
    pub fn new(results: Vec<BatchDeleteOutcome>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Overall state. An empty batch counts as succeeded.
    #[must_use]
    pub const fn status(&self) -> BatchStatus {
        match (self.succeeded, self.failed) {
            (_, 0) => BatchStatus::AllSucceeded,
            (0, _) => BatchStatus::AllFailed,
            _ => BatchStatus::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let ok = BatchDeleteOutcome::deleted(1, "employee_a".into());
        let bad = BatchDeleteOutcome::failed(2, "Employee not found", vec![]);

        assert_eq!(
            BatchDeleteSummary::new(vec![ok.clone()]).status(),
            BatchStatus::AllSucceeded
        );
        assert_eq!(
            BatchDeleteSummary::new(vec![ok, bad.clone()]).status(),
            BatchStatus::Partial
        );
        assert_eq!(
            BatchDeleteSummary::new(vec![bad]).status(),
            BatchStatus::AllFailed
        );
    }
}
