//! Byte-level constants and helpers shared by the tokenizer and both corpus passes.

/// Maximum number of content bytes kept for a single token or bigram key.
pub const MAX_TOKEN_LEN: usize = 59;

/// Byte joining the two halves of a bigram key inside the vocabulary.
pub const BIGRAM_SEPARATOR: u8 = b'_';

/// Byte written between two tokens that were merged into a phrase.
pub const PHRASE_SEPARATOR: u8 = b'_';

/// Byte written between two tokens that were not merged.
pub const TOKEN_SEPARATOR: u8 = b' ';

/// Line break; the only delimiter that carries meaning.
pub const LINE_BREAK: u8 = b'\n';

/// Carriage return, dropped wherever it appears.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Returns `true` for the bytes that terminate a token.
#[inline]
#[must_use]
pub fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | LINE_BREAK)
}

/// Writes the bigram key `left` + [`BIGRAM_SEPARATOR`] + `right` into `out`, truncated to
/// [`MAX_TOKEN_LEN`] bytes.
///
/// The buffer is cleared first so callers can reuse a single allocation across the corpus.
pub fn bigram_key_into(left: &[u8], right: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.extend_from_slice(left);
    out.push(BIGRAM_SEPARATOR);
    out.extend_from_slice(right);
    out.truncate(MAX_TOKEN_LEN);
}

/// Polynomial rolling hash over `bytes` reduced into `[0, capacity)`.
///
/// Starts from 1 and folds each byte as `hash * 257 + byte` with wrapping unsigned arithmetic.
#[inline]
#[must_use]
pub fn token_hash(bytes: &[u8], capacity: usize) -> usize {
    let hash = bytes.iter().fold(1u64, |hash, &byte| {
        hash.wrapping_mul(257).wrapping_add(u64::from(byte))
    });
    (hash % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters_are_space_tab_and_newline() {
        assert!(is_delimiter(b' '));
        assert!(is_delimiter(b'\t'));
        assert!(is_delimiter(b'\n'));
        assert!(!is_delimiter(b'\r'));
        assert!(!is_delimiter(b'_'));
        assert!(!is_delimiter(0x0B));
    }

    #[test]
    fn bigram_key_joins_with_separator() {
        let mut key = Vec::new();
        bigram_key_into(b"new", b"york", &mut key);
        assert_eq!(key, b"new_york");
        bigram_key_into(b"a", b"b", &mut key);
        assert_eq!(key, b"a_b");
    }

    #[test]
    fn bigram_key_is_truncated() {
        let left = vec![b'l'; 40];
        let right = vec![b'r'; 40];
        let mut key = Vec::new();
        bigram_key_into(&left, &right, &mut key);
        assert_eq!(key.len(), MAX_TOKEN_LEN);
        assert_eq!(key[40], BIGRAM_SEPARATOR);
        assert!(key[41..].iter().all(|&b| b == b'r'));
    }

    #[test]
    fn hash_matches_polynomial_definition() {
        assert_eq!(token_hash(b"", 1000), 1);
        // (1 * 257 + 97) * 257 + 98 = 91_076
        assert_eq!(token_hash(b"ab", 1_000_000), 91_076);
        assert_eq!(token_hash(b"ab", 1000), 76);
    }

    #[test]
    fn hash_wraps_without_overflow_panics() {
        let long = vec![0xFFu8; 512];
        assert!(token_hash(&long, 7) < 7);
    }
}
