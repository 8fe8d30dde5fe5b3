//! Random short code generation.
//!
//! Codes are fixed-length strings drawn uniformly, character by character,
//! from a configurable alphanumeric alphabet. Uniqueness against the store is
//! checked by the caller (see
//! [`crate::application::services::LinkService`]).

use rand::Rng;

/// Default alphabet: `a-z`, `A-Z`, `0-9` (62 symbols).
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default code length. 62^6 is roughly 5.6e10 combinations.
pub const DEFAULT_CODE_LENGTH: usize = 6;

pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// Codes that cannot be handed out because they collide with fixed routes.
const RESERVED_CODES: &[&str] = &["api", "health", "stats", "cleanup", "shorten"];

/// Errors for an unusable generator configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodeGeneratorError {
    #[error("Alphabet must contain only ASCII letters and digits")]
    NonAlphanumeric,

    #[error("Alphabet must contain at least two distinct characters without repeats")]
    InvalidAlphabet,

    #[error("Code length must be 4-32 characters, got {0}")]
    InvalidLength(usize),
}

/// Produces random codes of a fixed length over a fixed alphabet.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<u8>,
    length: usize,
}

impl CodeGenerator {
    /// Builds a generator after validating the alphabet and length.
    ///
    /// # Errors
    ///
    /// - [`CodeGeneratorError::NonAlphanumeric`] if any symbol is not `[A-Za-z0-9]`
    /// - [`CodeGeneratorError::InvalidAlphabet`] for fewer than two symbols or repeats,
    ///   since repeats would skew the distribution
    /// - [`CodeGeneratorError::InvalidLength`] outside `4..=32`
    pub fn new(alphabet: &str, length: usize) -> Result<Self, CodeGeneratorError> {
        if !alphabet.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CodeGeneratorError::NonAlphanumeric);
        }

        let symbols = alphabet.as_bytes().to_vec();
        let mut distinct = symbols.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 2 || distinct.len() != symbols.len() {
            return Err(CodeGeneratorError::InvalidAlphabet);
        }

        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(CodeGeneratorError::InvalidLength(length));
        }

        Ok(Self {
            alphabet: symbols,
            length,
        })
    }

    /// Draws one random code. Reserved route names are never returned.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();

        loop {
            let code: String = (0..self.length)
                .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())] as char)
                .collect();

            if !is_reserved(&code) {
                return code;
            }
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns true if `code` could have been produced by this generator.
    pub fn matches(&self, code: &str) -> bool {
        code.len() == self.length && code.bytes().all(|b| self.alphabet.contains(&b))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.as_bytes().to_vec(),
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

/// Returns true for codes shadowed by fixed routes.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
