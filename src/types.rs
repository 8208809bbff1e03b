//! Core types for the optimizer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle status shared by evaluation results, data points and whole
/// optimizer states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// Requested but not yet picked up.
    #[default]
    Pending,
    /// The evaluation is in progress.
    Running,
    /// The evaluation finished and produced a performance value.
    Completed,
    /// The evaluation failed.
    Failed,
}

impl Status {
    /// Folds a set of statuses into one aggregate.
    ///
    /// `Failed` dominates, then `Running`; the aggregate is `Completed` only
    /// when every status is `Completed`. An empty set is `Pending`.
    pub fn aggregate(statuses: impl IntoIterator<Item = Status>) -> Status {
        let mut any = false;
        let mut all_completed = true;
        let mut running = false;
        for status in statuses {
            any = true;
            match status {
                Status::Failed => return Status::Failed,
                Status::Running => running = true,
                Status::Completed => continue,
                Status::Pending => {}
            }
            all_completed = false;
        }
        if running {
            Status::Running
        } else if any && all_completed {
            Status::Completed
        } else {
            Status::Pending
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Status::Pending => "pending",
            Status::Running => "running",
            Status::Completed => "completed",
            Status::Failed => "failed",
        };
        f.write_str(label)
    }
}
