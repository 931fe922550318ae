//! Second corpus pass: score adjacent pairs against the frozen vocabulary and write the
//! corpus back out with selected pairs joined into phrases.

use std::io::{BufRead, Write};
use std::time::Instant;

use log::info;

use crate::bytes::{bigram_key_into, LINE_BREAK, MAX_TOKEN_LEN, PHRASE_SEPARATOR, TOKEN_SEPARATOR};
use crate::config::PhraseConfig;
use crate::error::Result;
use crate::learn::{LearnOutcome, PROGRESS_INTERVAL};
use crate::metrics::EmitMetrics;
use crate::tokenizer::{Token, Tokenizer};

/// Association score of the pair `(a, b)`.
///
/// `pa` and `pb` are the unigram counts, `pab` the bigram count. Returns 0 whenever either
/// unigram is below `min_count`; otherwise
/// `(pab - min_count) / pa / pb * total_tokens`.
#[must_use]
pub fn association_score(pa: u64, pb: u64, pab: u64, min_count: u64, total_tokens: u64) -> f64 {
    if pa < min_count || pb < min_count || pa == 0 || pb == 0 {
        return 0.0;
    }
    (pab as f64 - min_count as f64) / pa as f64 / pb as f64 * total_tokens as f64
}

/// Re-reads the corpus and writes it to `writer`, joining each pair whose score exceeds
/// [`PhraseConfig::threshold`] with the phrase separator.
///
/// Merging is greedy and left to right: once a token is joined to its predecessor it cannot
/// also be joined to its successor in the same pass. Line breaks are copied through and
/// reset pairing, so the first token of a line is never merged.
pub fn emit_phrases<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    learned: &LearnOutcome,
    cfg: &PhraseConfig,
) -> Result<EmitMetrics> {
    let start = Instant::now();
    let vocabulary = &learned.vocabulary;
    let total_tokens = learned.total_tokens();
    let mut tokenizer = Tokenizer::new(reader);
    let mut metrics = EmitMetrics::default();

    let mut previous = Vec::with_capacity(MAX_TOKEN_LEN);
    let mut bigram = Vec::with_capacity(MAX_TOKEN_LEN + 1);
    let mut line_start = true;
    // Set once the previous token has been joined to its predecessor.
    let mut consumed = false;
    let mut pa = 0u64;

    while let Some(token) = tokenizer.next_token()? {
        let word = match token {
            Token::Boundary => {
                writer.write_all(&[LINE_BREAK])?;
                metrics.lines += 1;
                line_start = true;
                consumed = false;
                pa = 0;
                continue;
            }
            Token::Word(word) => word,
        };

        metrics.tokens += 1;
        if cfg.show_progress && metrics.tokens % PROGRESS_INTERVAL == 0 {
            info!("words written: {}M", metrics.tokens / PROGRESS_INTERVAL);
        }

        let pb = vocabulary.frequency_of(word);
        if line_start {
            pa = pb.unwrap_or(0);
        } else if consumed {
            writer.write_all(&[TOKEN_SEPARATOR])?;
            consumed = false;
            pa = pb.unwrap_or(0);
        } else {
            bigram_key_into(&previous, word, &mut bigram);
            let pab = vocabulary.frequency_of(&bigram);
            let score = match (pb, pab) {
                (Some(pb), Some(pab)) => {
                    association_score(pa, pb, pab, cfg.min_count, total_tokens)
                }
                _ => 0.0,
            };
            if score > cfg.threshold {
                writer.write_all(&[PHRASE_SEPARATOR])?;
                metrics.phrases += 1;
                consumed = true;
            } else {
                writer.write_all(&[TOKEN_SEPARATOR])?;
                pa = pb.unwrap_or(0);
            }
        }
        writer.write_all(word)?;

        previous.clear();
        previous.extend_from_slice(word);
        line_start = false;
    }

    writer.flush()?;
    metrics.elapsed = start.elapsed();
    if cfg.show_progress {
        info!(
            "wrote {} words in {} lines, {} merged into phrases",
            metrics.tokens, metrics.lines, metrics.phrases
        );
    }
    Ok(metrics)
}
