/// Pipeline state definitions for tracking harvest progress
///
/// A run walks these states in order; `Cancelled` can be entered from any
/// active state when the run's cancellation token fires.
use std::fmt;

/// Represents the current stage of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Pipeline constructed, nothing fetched yet
    Idle,

    /// Listing pages are being fetched and filtered
    FetchingLists,

    /// Listing entries are being partitioned into month buckets
    GroupingByBucket,

    /// Thread pages are being fetched, one batch per bucket
    FetchingDetailsPerBucket,

    /// Records are being flattened and sorted
    Aggregating,

    /// The report has been handed to the emitter
    Done,

    /// The run was cancelled before finishing
    Cancelled,
}

impl PipelineState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;

        if next == Cancelled {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Idle, FetchingLists)
                | (FetchingLists, GroupingByBucket)
                | (GroupingByBucket, FetchingDetailsPerBucket)
                | (FetchingDetailsPerBucket, Aggregating)
                | (Aggregating, Done)
                // per-page aggregation loops back for every listing page
                | (FetchingLists, FetchingDetailsPerBucket)
                | (Aggregating, FetchingLists)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingLists => "fetching_lists",
            Self::GroupingByBucket => "grouping_by_bucket",
            Self::FetchingDetailsPerBucket => "fetching_details",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
