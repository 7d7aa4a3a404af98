//! Random identifiers for regular pastes and minted tokens.

use crate::constants::{ID_ALPHABET, LONG_TOKEN_LEN, SHORT_ID_LEN};
use rand::Rng;

/// Source of fresh paste ids and bearer tokens.
///
/// Implementations make no uniqueness promise; the paste store's primary key
/// is what rejects a collision.
pub trait IdGenerator: Send + Sync {
    /// Short id for a regular paste.
    fn short_id(&self) -> String;

    /// Long opaque bearer token.
    fn long_token(&self) -> String;
}

/// Thread-RNG backed generator over the URL-safe alphabet.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn short_id(&self) -> String {
        random_id(SHORT_ID_LEN)
    }

    fn long_token(&self) -> String {
        random_id(LONG_TOKEN_LEN)
    }
}

/// Generate a random string of `len` characters from [`ID_ALPHABET`].
pub fn random_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_url_safe(value: &str) -> bool {
        value.bytes().all(|byte| ID_ALPHABET.contains(&byte))
    }

    #[test]
    fn short_ids_have_fixed_length_and_url_safe_characters() {
        for _ in 0..200 {
            let id = RandomIds.short_id();
            assert_eq!(id.len(), SHORT_ID_LEN);
            assert!(is_url_safe(&id), "unexpected character in {id}");
        }
    }

    #[test]
    fn long_tokens_are_32_characters() {
        let token = RandomIds.long_token();
        assert_eq!(token.len(), 32);
        assert!(is_url_safe(&token));
    }

    #[test]
    fn ids_do_not_repeat_in_a_modest_sample() {
        let ids: HashSet<String> = (0..1_000).map(|_| RandomIds.short_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn alphabet_has_64_distinct_symbols() {
        let unique: HashSet<&u8> = ID_ALPHABET.iter().collect();
        assert_eq!(unique.len(), 64);
        assert!(!is_url_safe("has space"));
        assert!(!is_url_safe("slash/"));
    }
}
