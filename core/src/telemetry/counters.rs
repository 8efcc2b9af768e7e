// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters collected during one pipeline run.
//!
//! Converted into an immutable `PipelineSnapshot` at the end of the run.
use serde::{Deserialize, Serialize};

use crate::manifest::PatchOutcome;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineCounters {
    pub bytes_container: u64,
    pub bytes_plaintext: u64,
    pub bytes_written: u64,
    pub files_written: u64,
    pub passes_applied: u64,
    pub passes_not_found: u64,
    pub records_patched: u64,
    pub fields_created: u64,
    pub fields_updated: u64,
    pub temps_removed: u64,
    pub temps_failed: u64,
}

impl PipelineCounters {
    /// Record a decoded container.
    pub fn add_decode(&mut self, container_len: usize, plaintext_len: usize) {
        self.bytes_container += container_len as u64;
        self.bytes_plaintext += plaintext_len as u64;
    }

    /// Record one file written to the image directory.
    pub fn add_write(&mut self, len: usize) {
        self.files_written += 1;
        self.bytes_written += len as u64;
    }

    pub fn add_patch(&mut self, outcome: &PatchOutcome) {
        match *outcome {
            PatchOutcome::Applied { records, created, updated } => {
                self.passes_applied += 1;
                self.records_patched += records as u64;
                self.fields_created += created as u64;
                self.fields_updated += updated as u64;
            }
            PatchOutcome::NotFound => self.passes_not_found += 1,
        }
    }

    pub fn add_cleanup(&mut self, removed: usize, failed: usize) {
        self.temps_removed += removed as u64;
        self.temps_failed += failed as u64;
    }
}
