//! Per-record outcomes and the batch report

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{STATUS_FAILED, STATUS_OK};
use crate::error::RelayError;

/// Last stage a failed record completed
///
/// Key decoding and classification share `Received` and `Classified`: a key
/// that fails to decode never reaches classification. `Written` is the
/// interesting one: the derived object exists but the source was not
/// retired, so both are present until the notification is re-delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecordStage {
    Received,
    Classified,
    Fetched,
    Decompressed,
    Written,
    Deleted,
}

impl RecordStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStage::Received => "received",
            RecordStage::Classified => "classified",
            RecordStage::Fetched => "fetched",
            RecordStage::Decompressed => "decompressed",
            RecordStage::Written => "written",
            RecordStage::Deleted => "deleted",
        }
    }
}

impl fmt::Display for RecordStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one notification record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Derived object written and source deleted
    Relayed {
        bucket: String,
        source_key: String,
        destination_key: String,
        bytes: usize,
    },
    /// Key did not carry the compression suffix; nothing was touched
    Skipped {
        bucket: String,
        key: String,
        reason: String,
    },
    Failed {
        bucket: String,
        /// Canonical key when decoding succeeded, raw key otherwise
        key: String,
        stage: RecordStage,
        error: RelayError,
    },
}

impl RecordOutcome {
    pub fn is_relayed(&self) -> bool {
        matches!(self, RecordOutcome::Relayed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RecordOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecordOutcome::Failed { .. })
    }

    /// True when the derived object was committed but the source survived
    pub fn left_source_behind(&self) -> bool {
        matches!(
            self,
            RecordOutcome::Failed {
                stage: RecordStage::Written,
                ..
            }
        )
    }
}

/// How a failed record affects the rest of the batch and the final status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed record; later records are not attempted
    Abort,
    /// Attempt every record; the invocation fails if any record failed
    #[default]
    Continue,
    /// Attempt every record; record failures are only logged
    BestEffort,
}

/// Coarse result of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    Ok,
    Failed,
}

impl InvocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationStatus::Ok => STATUS_OK,
            InvocationStatus::Failed => STATUS_FAILED,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, InvocationStatus::Ok)
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcomes of one batch, in delivery order
#[derive(Debug, Clone)]
pub struct BatchReport {
    policy: FailurePolicy,
    total_records: usize,
    outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn new(policy: FailurePolicy, total_records: usize) -> Self {
        Self {
            policy,
            total_records,
            outcomes: Vec::with_capacity(total_records),
        }
    }

    pub fn push(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[RecordOutcome] {
        &self.outcomes
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn relayed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_relayed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Records never attempted because the batch was aborted
    pub fn not_attempted(&self) -> usize {
        self.total_records.saturating_sub(self.outcomes.len())
    }

    pub fn status(&self) -> InvocationStatus {
        match self.policy {
            FailurePolicy::BestEffort => InvocationStatus::Ok,
            FailurePolicy::Abort | FailurePolicy::Continue if self.failed() > 0 => {
                InvocationStatus::Failed
            }
            FailurePolicy::Abort | FailurePolicy::Continue => InvocationStatus::Ok,
        }
    }
}
