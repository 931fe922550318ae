//! Two-pass phrase detection pipeline tying learning and emission together.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::config::{PhraseBuilder, PhraseConfig};
use crate::corpus::{create_output, open_corpus};
use crate::emit::emit_phrases;
use crate::error::Result;
use crate::learn::{learn_vocabulary, LearnOutcome};
use crate::metrics::{EmitMetrics, RunReport};

/// High-level façade owning the configuration of a run.
///
/// The vocabulary learned by the first pass is handed to the second pass by value; it is
/// never mutated after finalization.
#[derive(Debug, Clone)]
pub struct PhrasePipeline {
    cfg: PhraseConfig,
}

/// Artifacts returned after both passes complete.
#[must_use]
#[derive(Debug, Clone)]
pub struct PhraseArtifacts {
    /// Finalized vocabulary and learning metrics.
    pub learned: LearnOutcome,
    /// Emission metrics.
    pub emit: EmitMetrics,
}

impl PhraseArtifacts {
    /// Builds a serializable report of the run.
    pub fn report(&self, cfg: &PhraseConfig) -> RunReport {
        RunReport {
            config: cfg.clone(),
            learn: self.learned.metrics.clone(),
            emit: self.emit.clone(),
        }
    }
}

impl PhrasePipeline {
    /// Creates a pipeline for the supplied configuration.
    #[must_use]
    pub fn new(cfg: PhraseConfig) -> Self {
        Self { cfg }
    }

    /// Returns a [`PhraseBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> PhraseBuilder {
        PhraseConfig::builder()
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &PhraseConfig {
        &self.cfg
    }

    /// Runs only the learning pass over the corpus at `input`.
    pub fn learn_from_path<P: AsRef<Path>>(&self, input: P) -> Result<LearnOutcome> {
        let input = input.as_ref();
        info!("learning vocabulary from {}", input.display());
        learn_vocabulary(open_corpus(input)?, &self.cfg)
    }

    /// Reads `input` twice and writes the phrase-merged corpus to `output`.
    ///
    /// The output file is only created once the learning pass has succeeded.
    pub fn run_paths<P, Q>(&self, input: P, output: Q) -> Result<PhraseArtifacts>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input = input.as_ref();
        let learned = self.learn_from_path(input)?;
        let writer = create_output(output)?;
        self.emit_from_path(input, writer, learned)
    }

    /// Reads `input` twice and writes the phrase-merged corpus to `writer`.
    pub fn run_to_writer<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        writer: W,
    ) -> Result<PhraseArtifacts> {
        let input = input.as_ref();
        let learned = self.learn_from_path(input)?;
        self.emit_from_path(input, writer, learned)
    }

    fn emit_from_path<W: Write>(
        &self,
        input: &Path,
        writer: W,
        learned: LearnOutcome,
    ) -> Result<PhraseArtifacts> {
        let start = Instant::now();
        let emit = emit_phrases(open_corpus(input)?, writer, &learned, &self.cfg)?;
        info!("emission pass finished in {:.2?}", start.elapsed());
        Ok(PhraseArtifacts { learned, emit })
    }

    /// Runs both passes over an in-memory corpus.
    pub fn run_from_bytes<W: Write>(&self, corpus: &[u8], writer: W) -> Result<PhraseArtifacts> {
        let learned = learn_vocabulary(corpus, &self.cfg)?;
        let emit = emit_phrases(corpus, writer, &learned, &self.cfg)?;
        Ok(PhraseArtifacts { learned, emit })
    }
}

impl fmt::Display for PhraseArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let learn = &self.learned.metrics;
        writeln!(
            f,
            "Vocab size (unigrams + bigrams): {}",
            self.learned.vocabulary.len()
        )?;
        writeln!(f, "Words in train file: {}", learn.total_tokens)?;
        writeln!(f, "Vocabulary reductions: {}", learn.reductions.len())?;
        writeln!(
            f,
            "Phrases formed: {} of {} words",
            self.emit.phrases, self.emit.tokens
        )?;
        Ok(())
    }
}
