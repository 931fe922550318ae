//! Configuration builders controlling vocabulary learning and phrase emission.

use std::convert::TryFrom;

use crate::error::{PhrasalError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a phrase detection run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseConfig {
    /// Frequency floor applied to unigrams and bigrams alike; entries below it are discarded.
    pub min_count: u64,
    /// Score a pair must strictly exceed before it is merged into a phrase.
    pub threshold: f64,
    /// Number of slots in the open-addressing vocabulary index. Never resized during a run.
    pub hash_capacity: usize,
    /// Fraction of `hash_capacity` that live entries may occupy before low counts are pruned.
    pub reduce_load_factor: f64,
    /// Enables periodic progress logging through the `log` facade.
    pub show_progress: bool,
}

impl PhraseConfig {
    /// Returns a builder initialised with [`PhraseConfig::default`].
    #[must_use]
    pub fn builder() -> PhraseBuilder {
        PhraseBuilder::default()
    }

    /// Validates the invariants required by both corpus passes.
    pub fn validate(&self) -> Result<()> {
        if self.min_count == 0 {
            return Err(PhrasalError::InvalidConfig(
                "min_count must be greater than zero".into(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(PhrasalError::InvalidConfig(format!(
                "threshold ({}) must be a finite number",
                self.threshold
            )));
        }
        if self.hash_capacity == 0 {
            return Err(PhrasalError::InvalidConfig(
                "hash_capacity must be greater than zero".into(),
            ));
        }
        let max_capacity = usize::try_from(u32::MAX).unwrap_or(usize::MAX);
        if self.hash_capacity > max_capacity {
            return Err(PhrasalError::InvalidConfig(format!(
                "hash_capacity ({}) exceeds {max_capacity}, the maximum addressable slot",
                self.hash_capacity
            )));
        }
        if !(self.reduce_load_factor > 0.0 && self.reduce_load_factor < 1.0) {
            return Err(PhrasalError::InvalidConfig(format!(
                "reduce_load_factor ({}) must lie strictly between 0 and 1",
                self.reduce_load_factor
            )));
        }
        if self.reduce_trigger() == 0 {
            return Err(PhrasalError::InvalidConfig(format!(
                "hash_capacity ({}) leaves no room beside the line boundary entry",
                self.hash_capacity
            )));
        }
        Ok(())
    }

    /// Live entry count above which the incremental reducer runs.
    #[must_use]
    pub fn reduce_trigger(&self) -> usize {
        (self.hash_capacity as f64 * self.reduce_load_factor) as usize
    }
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            min_count: 5,
            threshold: 100.0,
            hash_capacity: 30_000_000,
            reduce_load_factor: 0.7,
            show_progress: true,
        }
    }
}

/// Builder for [`PhraseConfig`].
#[derive(Debug, Default, Clone)]
pub struct PhraseBuilder {
    cfg: PhraseConfig,
}

impl PhraseBuilder {
    /// Creates a builder with [`PhraseConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frequency floor for unigrams and bigrams.
    #[must_use]
    pub fn min_count(mut self, value: u64) -> Self {
        self.cfg.min_count = value;
        self
    }

    /// Sets the merge score cutoff.
    #[must_use]
    pub fn threshold(mut self, value: f64) -> Self {
        self.cfg.threshold = value;
        self
    }

    /// Sets the fixed slot count of the vocabulary index.
    #[must_use]
    pub fn hash_capacity(mut self, value: usize) -> Self {
        self.cfg.hash_capacity = value;
        self
    }

    /// Sets the load factor that triggers incremental pruning.
    #[must_use]
    pub fn reduce_load_factor(mut self, value: f64) -> Self {
        self.cfg.reduce_load_factor = value;
        self
    }

    /// Enables or disables progress logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`PhraseConfig`].
    pub fn build(self) -> Result<PhraseConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}
