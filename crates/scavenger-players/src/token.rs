use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

/// Opaque 32-hex-character bearer token identifying a joined player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

/// Returned when an `Authorization` header isn't a well-formed token at
/// all (wrong length, non-hex characters) — distinct from a well-formed
/// token that simply isn't registered (see [`crate::UnknownToken`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidToken;

impl Token {
    /// Draws two random `u64`s and formats each as 16 lowercase hex
    /// digits, concatenated — the same construction as the original
    /// server's `GenerateRandomHex`-based token generator, just reseeded
    /// from OS randomness instead of `std::random_device`.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let hi: u64 = rng.random();
        let lo: u64 = rng.random();
        Self(format!("{hi:016x}{lo:016x}"))
    }

    pub fn parse(s: &str) -> Result<Self, InvalidToken> {
        if s.len() == 32 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(InvalidToken)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn generated_token_is_32_lowercase_hex_chars() {
        let mut rng = SmallRng::seed_from_u64(1);
        let token = Token::generate(&mut rng);
        assert_eq!(token.as_str().len(), 32);
        assert!(token.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn two_generated_tokens_differ() {
        let mut rng = SmallRng::seed_from_u64(2);
        let a = Token::generate(&mut rng);
        let b = Token::generate(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Token::parse("abc").is_err());
    }

    #[test]
    fn parse_rejects_non_hex_characters() {
        assert!(Token::parse(&"z".repeat(32)).is_err());
    }

    #[test]
    fn parse_accepts_well_formed_token() {
        assert!(Token::parse(&"a".repeat(32)).is_ok());
    }
}
