//! Metrics describing both corpus passes of a phrase detection run.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::PhraseConfig;
use crate::error::{PhrasalError, Result};

/// Snapshot of one incremental reducer invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReductionMetrics {
    /// Entries with a frequency at or below this value were dropped.
    pub threshold: u64,
    /// Live entries before pruning, boundary included.
    pub entries_before: usize,
    /// Live entries after pruning, boundary included.
    pub entries_after: usize,
}

/// Metrics captured while learning the vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearnMetrics {
    /// Non-boundary tokens read from the corpus.
    pub total_tokens: u64,
    /// Adjacent in-line token pairs counted as bigrams.
    pub bigrams: u64,
    /// Line boundaries encountered.
    pub boundaries: u64,
    /// Every incremental reducer run, in order.
    pub reductions: Vec<ReductionMetrics>,
    /// Live entries once the corpus was exhausted, before finalization.
    pub entries_before_finalize: usize,
    /// Entries kept by finalization, boundary included.
    pub vocab_size: usize,
    /// Wall time of the pass including finalization.
    pub elapsed: Duration,
    /// Resident set size sample captured from `/proc/self/status` on Linux.
    pub rss_kb: Option<usize>,
}

/// Metrics captured while scoring and writing the transformed corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmitMetrics {
    /// Non-boundary tokens written.
    pub tokens: u64,
    /// Tokens joined to their predecessor with the phrase separator.
    pub phrases: u64,
    /// Line breaks written.
    pub lines: u64,
    /// Wall time of the pass.
    pub elapsed: Duration,
}

/// Aggregate report for a full run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// Configuration the run used.
    pub config: PhraseConfig,
    /// Learning pass metrics.
    pub learn: LearnMetrics,
    /// Emission pass metrics.
    pub emit: EmitMetrics,
}

impl RunReport {
    /// Serializes the report as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Writes the report as pretty JSON to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json(true)?;
        std::fs::write(path, json).map_err(|err| PhrasalError::io(err, Some(path.to_path_buf())))
    }
}

#[cfg(target_os = "linux")]
fn current_rss_kb() -> Option<usize> {
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    let file = File::open("/proc/self/status").ok()?;
    for line in BufReader::new(file).lines().map_while(std::result::Result::ok) {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            return rest
                .split_whitespace()
                .find_map(|part| part.parse::<usize>().ok());
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn current_rss_kb() -> Option<usize> {
    None
}

/// Samples the current resident set size (RSS) on supported platforms.
pub fn sample_rss_kb() -> Option<usize> {
    current_rss_kb()
}
