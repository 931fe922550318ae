//! Frequency-driven phrase detection for whitespace-tokenized corpora.
//!
//! The crate exposes both a library API and a `phrasal` command line interface.  A run
//! makes two passes over the same corpus: the first counts every token and every adjacent
//! pair within a line into a bounded open-addressing vocabulary, the second scores each
//! adjacent pair against those counts and joins high-scoring pairs with `_` so that
//! downstream embedding training sees them as single tokens.
//!
//! ```no_run
//! use phrasal::{PhraseConfig, PhrasePipeline};
//!
//! # fn main() -> phrasal::Result<()> {
//! let cfg = PhraseConfig::builder()
//!     .min_count(5)
//!     .threshold(100.0)
//!     .show_progress(false)
//!     .build()?;
//! let pipeline = PhrasePipeline::new(cfg);
//! let artifacts = pipeline.run_paths("text.txt", "phrases.txt")?;
//! println!("{artifacts}");
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting the
//! library portion only can disable default features to avoid the CLI
//! dependencies: `phrasal = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::cast_precision_loss
)]

pub mod bytes;
pub mod config;
pub mod corpus;
pub mod emit;
pub mod error;
pub mod learn;
pub mod metrics;
pub mod pipeline;
pub mod tokenizer;
pub mod vocab;

pub use config::{PhraseBuilder, PhraseConfig};
pub use emit::{association_score, emit_phrases};
pub use error::{PhrasalError, Result};
pub use learn::{learn_vocabulary, LearnOutcome};
pub use metrics::{EmitMetrics, LearnMetrics, ReductionMetrics, RunReport};
pub use pipeline::{PhraseArtifacts, PhrasePipeline};
pub use tokenizer::{Token, Tokenizer};
pub use vocab::{VocabEntry, Vocabulary, VocabularyStore};
