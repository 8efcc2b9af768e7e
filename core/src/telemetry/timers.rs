// ## src/telemetry/timers.rs

//! telemetry/timers.rs
//! Stage timers for the variant pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Resolve,
    Decode,
    Parse,
    Patch,
    Write,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "resolve",
            Stage::Decode  => "decode",
            Stage::Parse   => "parse",
            Stage::Patch   => "patch",
            Stage::Write   => "write",
            Stage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Accumulated duration per stage. Ordered so JSON output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: BTreeMap<Stage, Duration>,
}

impl StageTimes {
    /// Add duration to a stage (accumulates if already present).
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_insert(Duration::ZERO) += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or(Duration::ZERO)
    }

    pub fn get_ms(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1_000.0
    }

    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    /// True when every stage in `expected` was entered at least once.
    pub fn has_all(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.times.contains_key(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Stage, &Duration)> {
        self.times.iter()
    }
}

#[derive(Clone, Debug)]
pub struct PipelineTimer {
    pub start_time: Instant,
    pub end_time: Option<Instant>,
    pub stage_times: StageTimes,
}

impl Default for PipelineTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineTimer {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            stage_times: StageTimes::default(),
        }
    }

    /// Run `f` and charge its wall time to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let t = Instant::now();
        let out = f();
        self.stage_times.add(stage, t.elapsed());
        out
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => Instant::now().duration_since(self.start_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_times_accumulate_in_stage_order() {
        let mut times = StageTimes::default();
        times.add(Stage::Write, Duration::from_millis(3));
        times.add(Stage::Decode, Duration::from_millis(2));
        times.add(Stage::Decode, Duration::from_millis(2));

        let stages: Vec<Stage> = times.iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, vec![Stage::Decode, Stage::Write]);
        assert_eq!(times.get_ms(Stage::Decode), 4.0);
        assert_eq!(times.get_ms(Stage::Parse), 0.0);
        assert_eq!(times.total(), Duration::from_millis(7));
    }
}
