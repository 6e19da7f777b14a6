//! Terminal result of a collection run.

use std::path::PathBuf;

pub use diagpull_common::ReasonCode;

/// The single value a run returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// The bundle was saved at `path`; `size_bytes` is its on-disk size.
    Success { path: PathBuf, size_bytes: u64 },
    Failure(ReasonCode),
}

impl WorkflowOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Process exit code for this outcome: 0 on success, 1 on any failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}
