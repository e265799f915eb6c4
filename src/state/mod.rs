//! State module for tracking harvest progress
//!
//! `PipelineState` is the stage machine a harvest run walks through, from
//! listing fetches to the final report write.

mod pipeline_state;

pub use pipeline_state::PipelineState;
