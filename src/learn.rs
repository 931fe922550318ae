//! First corpus pass: count unigrams and in-line bigrams, then finalize the vocabulary.

use std::io::BufRead;
use std::time::Instant;

use bstr::ByteSlice;
use log::{debug, info};

use crate::bytes::{bigram_key_into, MAX_TOKEN_LEN};
use crate::config::PhraseConfig;
use crate::error::Result;
use crate::metrics::{sample_rss_kb, LearnMetrics, ReductionMetrics};
use crate::tokenizer::{Token, Tokenizer};
use crate::vocab::{Vocabulary, VocabularyStore};

/// Tokens between two progress log lines.
pub(crate) const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Finalized vocabulary plus the counts the emission pass needs.
#[must_use]
#[derive(Debug, Clone)]
pub struct LearnOutcome {
    /// Sorted, pruned, read-only vocabulary.
    pub vocabulary: Vocabulary,
    /// Detailed metrics captured during the pass.
    pub metrics: LearnMetrics,
}

impl LearnOutcome {
    /// Non-boundary tokens in the corpus; the scale factor of the association score.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.metrics.total_tokens
    }
}

/// Streams the corpus once, counting every token and every adjacent pair within a line.
///
/// Bigram keys join the previous and current token with the bigram separator. The store is
/// pruned whenever live entries exceed the configured load, and finalized with
/// [`PhraseConfig::min_count`] once the input is exhausted.
pub fn learn_vocabulary<R: BufRead>(reader: R, cfg: &PhraseConfig) -> Result<LearnOutcome> {
    cfg.validate()?;
    let start = Instant::now();
    let trigger = cfg.reduce_trigger();
    let mut store = VocabularyStore::new(cfg.hash_capacity)?;
    let mut tokenizer = Tokenizer::new(reader);

    let mut previous = Vec::with_capacity(MAX_TOKEN_LEN);
    let mut bigram = Vec::with_capacity(MAX_TOKEN_LEN + 1);
    let mut line_start = true;
    let mut total_tokens = 0u64;
    let mut bigrams = 0u64;
    let mut boundaries = 0u64;
    let mut reductions = Vec::new();

    while let Some(token) = tokenizer.next_token()? {
        let word = match token {
            Token::Boundary => {
                boundaries += 1;
                line_start = true;
                continue;
            }
            Token::Word(word) => word,
        };

        total_tokens += 1;
        if cfg.show_progress && total_tokens % PROGRESS_INTERVAL == 0 {
            info!(
                "words processed: {}M vocab size: {}K",
                total_tokens / PROGRESS_INTERVAL,
                store.len() / 1000
            );
        }

        store.count(word)?;
        reduce_if_needed(&mut store, trigger, &mut reductions)?;

        if !line_start {
            bigram_key_into(&previous, word, &mut bigram);
            store.count(&bigram)?;
            bigrams += 1;
            reduce_if_needed(&mut store, trigger, &mut reductions)?;
        }

        previous.clear();
        previous.extend_from_slice(word);
        line_start = false;
    }

    let entries_before_finalize = store.len();
    let vocabulary = store.finalize(cfg.min_count)?;
    let elapsed = start.elapsed();

    if cfg.show_progress {
        info!(
            "vocab size (unigrams + bigrams): {} (from {entries_before_finalize}); words in corpus: {total_tokens}; reductions: {}",
            vocabulary.len(),
            reductions.len()
        );
        if let Some(top) = vocabulary.entries().get(1) {
            debug!(
                "most frequent entry {:?} seen {} times",
                top.token().as_bstr(),
                top.frequency()
            );
        }
    }

    let metrics = LearnMetrics {
        total_tokens,
        bigrams,
        boundaries,
        reductions,
        entries_before_finalize,
        vocab_size: vocabulary.len(),
        elapsed,
        rss_kb: sample_rss_kb(),
    };
    Ok(LearnOutcome {
        vocabulary,
        metrics,
    })
}

fn reduce_if_needed(
    store: &mut VocabularyStore,
    trigger: usize,
    reductions: &mut Vec<ReductionMetrics>,
) -> Result<()> {
    if store.len() <= trigger {
        return Ok(());
    }
    let outcome = store.reduce()?;
    debug!(
        "pruned entries with frequency <= {}: {} -> {}",
        outcome.threshold, outcome.entries_before, outcome.entries_after
    );
    reductions.push(outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config(min_count: u64, hash_capacity: usize) -> PhraseConfig {
        PhraseConfig::builder()
            .min_count(min_count)
            .hash_capacity(hash_capacity)
            .show_progress(false)
            .build()
            .expect("valid config")
    }

    fn learn(corpus: &str, cfg: &PhraseConfig) -> LearnOutcome {
        learn_vocabulary(Cursor::new(corpus.as_bytes().to_vec()), cfg).expect("learn")
    }

    #[test]
    fn counts_unigrams_and_bigrams() {
        let outcome = learn("the new york city is big\n", &config(1, 1024));
        let vocab = &outcome.vocabulary;
        assert_eq!(outcome.total_tokens(), 6);
        assert_eq!(outcome.metrics.bigrams, 5);
        assert_eq!(outcome.metrics.boundaries, 1);
        // boundary + 6 unigrams + 5 bigrams
        assert_eq!(vocab.len(), 12);
        assert_eq!(vocab.frequency_of(b"new"), Some(1));
        assert_eq!(vocab.frequency_of(b"new_york"), Some(1));
        assert_eq!(vocab.frequency_of(b"york_city"), Some(1));
        assert_eq!(vocab.frequency_of(b"big_the"), None);
    }

    #[test]
    fn bigrams_do_not_cross_line_breaks() {
        let outcome = learn("a b\nc d\n\nb c", &config(1, 1024));
        let vocab = &outcome.vocabulary;
        assert_eq!(outcome.total_tokens(), 6);
        assert_eq!(vocab.frequency_of(b"a_b"), Some(1));
        assert_eq!(vocab.frequency_of(b"c_d"), Some(1));
        assert_eq!(vocab.frequency_of(b"b_c"), Some(1));
        assert_eq!(vocab.frequency_of(b"d_b"), None);
        assert_eq!(vocab.frequency_of(b"b"), Some(2));
        assert_eq!(outcome.metrics.boundaries, 3);
    }

    #[test]
    fn finalization_applies_min_count() {
        let outcome = learn("x y\nx y\nx z\n", &config(2, 1024));
        let vocab = &outcome.vocabulary;
        assert_eq!(vocab.frequency_of(b"x"), Some(3));
        assert_eq!(vocab.frequency_of(b"x_y"), Some(2));
        assert_eq!(vocab.frequency_of(b"y"), Some(2));
        assert_eq!(vocab.frequency_of(b"z"), None);
        assert_eq!(vocab.frequency_of(b"x_z"), None);
        assert_eq!(outcome.metrics.entries_before_finalize, 6);
        assert_eq!(outcome.metrics.vocab_size, 4);
        let entries = vocab.entries();
        assert!(entries[0].is_boundary());
        assert_eq!(entries[1].token(), b"x");
    }

    #[test]
    fn long_bigram_keys_are_truncated() {
        let left = "l".repeat(40);
        let right = "r".repeat(40);
        let outcome = learn(&format!("{left} {right}\n"), &config(1, 1024));
        let mut expected = format!("{left}_{right}");
        expected.truncate(MAX_TOKEN_LEN);
        assert_eq!(outcome.vocabulary.frequency_of(expected.as_bytes()), Some(1));
    }

    #[test]
    fn reducer_thresholds_rise_by_one() {
        let corpus: Vec<String> = (0..40).map(|i| format!("w{i}")).collect();
        let outcome = learn(&corpus.join(" "), &config(1, 20));
        let reductions = &outcome.metrics.reductions;
        assert!(reductions.len() >= 2, "expected repeated pruning");
        for (i, reduction) in reductions.iter().enumerate() {
            assert_eq!(reduction.threshold, i as u64 + 1);
            assert!(reduction.entries_after <= reduction.entries_before);
        }
        assert_eq!(outcome.total_tokens(), 40);
        assert!(outcome.vocabulary.entries()[0].is_boundary());
    }

    #[test]
    fn frequent_tokens_survive_pruning() {
        let mut corpus = String::new();
        for i in 0..30 {
            corpus.push_str(&format!("hot hot hot rare{i}\n"));
        }
        // Trigger is 11 live entries; each line adds two fresh singletons.
        let outcome = learn(&corpus, &config(1, 16));
        let reductions = &outcome.metrics.reductions;
        assert_eq!(reductions.len(), 6);
        for reduction in reductions {
            assert_eq!(reduction.entries_before, 12);
            assert_eq!(reduction.entries_after, 3);
        }
        let vocab = &outcome.vocabulary;
        assert_eq!(vocab.frequency_of(b"hot"), Some(90));
        assert_eq!(vocab.frequency_of(b"hot_hot"), Some(60));
        assert_eq!(vocab.frequency_of(b"rare26"), None);
        assert_eq!(vocab.frequency_of(b"rare27"), Some(1));
        assert_eq!(vocab.frequency_of(b"hot_rare29"), Some(1));
        assert_eq!(vocab.len(), 9);
    }

    #[test]
    fn smallest_valid_capacity_still_learns() {
        let outcome = learn("a b c\n", &config(1, 2));
        assert_eq!(outcome.total_tokens(), 3);
        assert!(!outcome.metrics.reductions.is_empty());
    }

    #[test]
    fn empty_corpus_yields_boundary_only() {
        let outcome = learn("", &config(1, 64));
        assert_eq!(outcome.total_tokens(), 0);
        assert_eq!(outcome.vocabulary.len(), 1);
    }
}
