//! Feed token minting.
//!
//! A token is the only thing standing between a client and a feed, so it must
//! come from a CSPRNG. `rand::rng()` is a ChaCha-based generator seeded and
//! periodically reseeded from the OS; it panics if the OS source fails, which
//! aborts the request.

use rand::Rng as _;

/// Default number of random bytes per token (40 hex characters).
pub const DEFAULT_TOKEN_BYTES: usize = 20;

/// Generates `length` random bytes rendered as lowercase hex.
pub fn mint(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand::rng().fill(bytes.as_mut_slice());
    hex::encode(bytes)
}

/// Mints tokens of a fixed byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMinter {
    length: usize,
}

impl Default for TokenMinter {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_BYTES)
    }
}

impl TokenMinter {
    /// Creates a minter producing tokens of `length` random bytes.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Random bytes per token.
    pub fn byte_length(&self) -> usize {
        self.length
    }

    /// Visible token length in characters.
    pub fn token_length(&self) -> usize {
        self.length * 2
    }

    /// Mints a fresh token.
    pub fn mint(&self) -> String {
        mint(self.length)
    }

    /// Returns true if `token` could have been produced by this minter.
    pub fn is_well_formed(&self, token: &str) -> bool {
        token.len() == self.token_length()
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

/// Shortened token for log output.
pub fn redact(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn mint_renders_lowercase_hex() {
        let token = mint(DEFAULT_TOKEN_BYTES);
        assert_eq!(token.len(), 40);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn mint_length_is_twice_byte_count() {
        assert_eq!(mint(1).len(), 2);
        assert_eq!(mint(16).len(), 32);
        assert_eq!(mint(0), "");
    }

    #[test]
    fn minted_tokens_do_not_collide() {
        let minter = TokenMinter::default();
        let tokens: HashSet<String> = (0..10_000).map(|_| minter.mint()).collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn minter_lengths() {
        let minter = TokenMinter::new(8);
        assert_eq!(minter.byte_length(), 8);
        assert_eq!(minter.token_length(), 16);
        assert_eq!(minter.mint().len(), 16);
    }

    #[test]
    fn well_formed_tokens() {
        let minter = TokenMinter::default();
        assert!(minter.is_well_formed(&minter.mint()));

        assert!(!minter.is_well_formed(""));
        assert!(!minter.is_well_formed("abc"));
        assert!(!minter.is_well_formed(&"A".repeat(40)));
        assert!(!minter.is_well_formed(&"g".repeat(40)));
        assert!(!minter.is_well_formed(&"0".repeat(42)));
        assert!(minter.is_well_formed(&"0".repeat(40)));
    }

    #[test]
    fn redact_keeps_prefix() {
        assert_eq!(redact("0123456789abcdef"), "01234567");
        assert_eq!(redact("abc"), "abc");
    }
}
