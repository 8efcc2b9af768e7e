// ## src/telemetry/snapshot.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::PipelineCounters;
use crate::telemetry::timers::{PipelineTimer, Stage, StageTimes};

/// Immutable summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub counters: PipelineCounters,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl PipelineSnapshot {
    pub fn from(counters: &PipelineCounters, timer: &PipelineTimer) -> Self {
        Self {
            counters: counters.clone(),
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Stage times never add up to more than the wall time of the run.
    pub fn sanity_check(&self) -> bool {
        self.stage_times.total() <= self.elapsed
    }
}
