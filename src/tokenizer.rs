//! Streaming whitespace tokenizer with explicit line boundaries.

use std::io::BufRead;

use crate::bytes::{is_delimiter, CARRIAGE_RETURN, LINE_BREAK, MAX_TOKEN_LEN};
use crate::error::Result;

/// Item produced by [`Tokenizer::next_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A line break in the input.
    Boundary,
    /// A run of non-delimiter bytes, at most [`MAX_TOKEN_LEN`] long.
    Word(&'a [u8]),
}

impl Token<'_> {
    /// Returns `true` for [`Token::Boundary`].
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self, Token::Boundary)
    }
}

enum Stop {
    Word,
    Boundary,
}

/// Splits a byte stream into tokens on space, tab and newline.
///
/// Carriage returns are discarded everywhere. A newline that ends a word is left in the
/// reader so the following call yields [`Token::Boundary`]. Bytes past [`MAX_TOKEN_LEN`] are
/// read and dropped until the next delimiter.
#[derive(Debug)]
pub struct Tokenizer<R> {
    reader: R,
    word: Vec<u8>,
}

impl<R: BufRead> Tokenizer<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            word: Vec::with_capacity(MAX_TOKEN_LEN),
        }
    }

    /// Returns the next token, or `None` once the input is exhausted.
    ///
    /// A word still pending at end of input is returned before `None`.
    pub fn next_token(&mut self) -> Result<Option<Token<'_>>> {
        self.word.clear();
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                break;
            }
            let mut consumed = 0usize;
            let mut stop = None;
            for &byte in available {
                if byte == CARRIAGE_RETURN {
                    consumed += 1;
                    continue;
                }
                if is_delimiter(byte) {
                    if !self.word.is_empty() {
                        // Leave a trailing newline for the next call.
                        if byte != LINE_BREAK {
                            consumed += 1;
                        }
                        stop = Some(Stop::Word);
                        break;
                    }
                    consumed += 1;
                    if byte == LINE_BREAK {
                        stop = Some(Stop::Boundary);
                        break;
                    }
                    continue;
                }
                consumed += 1;
                if self.word.len() < MAX_TOKEN_LEN {
                    self.word.push(byte);
                }
            }
            self.reader.consume(consumed);
            match stop {
                Some(Stop::Word) => return Ok(Some(Token::Word(&self.word))),
                Some(Stop::Boundary) => return Ok(Some(Token::Boundary)),
                None => {}
            }
        }
        if self.word.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Token::Word(&self.word)))
        }
    }

    /// Consumes the tokenizer, returning the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    #[derive(Debug, PartialEq, Eq)]
    enum Owned {
        Boundary,
        Word(Vec<u8>),
    }

    fn collect<R: BufRead>(mut tokenizer: Tokenizer<R>) -> Vec<Owned> {
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token().expect("read token") {
            out.push(match token {
                Token::Boundary => Owned::Boundary,
                Token::Word(bytes) => Owned::Word(bytes.to_vec()),
            });
        }
        out
    }

    fn tokens(input: &[u8]) -> Vec<Owned> {
        collect(Tokenizer::new(Cursor::new(input.to_vec())))
    }

    fn word(text: &str) -> Owned {
        Owned::Word(text.as_bytes().to_vec())
    }

    #[test]
    fn splits_on_spaces_tabs_and_newlines() {
        assert_eq!(
            tokens(b"the  new\tyork\ncity\n"),
            vec![
                word("the"),
                word("new"),
                word("york"),
                Owned::Boundary,
                word("city"),
                Owned::Boundary,
            ]
        );
    }

    #[test]
    fn blank_lines_yield_one_boundary_each() {
        assert_eq!(
            tokens(b"a\n\n\nb"),
            vec![
                word("a"),
                Owned::Boundary,
                Owned::Boundary,
                Owned::Boundary,
                word("b"),
            ]
        );
    }

    #[test]
    fn carriage_returns_are_dropped_everywhere() {
        assert_eq!(
            tokens(b"wi\rndows\r\nline\r\n"),
            vec![word("windows"), Owned::Boundary, word("line"), Owned::Boundary]
        );
    }

    #[test]
    fn empty_and_whitespace_only_inputs() {
        assert!(tokens(b"").is_empty());
        assert!(tokens(b"  \t \r").is_empty());
        assert_eq!(tokens(b" \n "), vec![Owned::Boundary]);
    }

    #[test]
    fn overlong_words_are_truncated_until_next_delimiter() {
        let mut input = vec![b'x'; MAX_TOKEN_LEN + 25];
        input.extend_from_slice(b" tail");
        let result = tokens(&input);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], Owned::Word(vec![b'x'; MAX_TOKEN_LEN]));
        assert_eq!(result[1], word("tail"));
    }

    #[test]
    fn tokens_survive_buffer_refills() {
        let input = b"alpha beta\ngamma delta".to_vec();
        let reader = BufReader::with_capacity(3, Cursor::new(input));
        assert_eq!(
            collect(Tokenizer::new(reader)),
            vec![
                word("alpha"),
                word("beta"),
                Owned::Boundary,
                word("gamma"),
                word("delta"),
            ]
        );
    }

    #[test]
    fn exhausted_tokenizer_keeps_returning_none() {
        let mut tokenizer = Tokenizer::new(Cursor::new(b"one".to_vec()));
        assert_eq!(
            tokenizer.next_token().expect("token"),
            Some(Token::Word(b"one"))
        );
        assert_eq!(tokenizer.next_token().expect("eof"), None);
        assert_eq!(tokenizer.next_token().expect("eof again"), None);
    }
}
