//! Short code generation.
//!
//! Codes only need to be unique, not unpredictable, so a fast thread-local
//! RNG is enough. Uniqueness itself is enforced by the store's conditional
//! write.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Default number of characters in a generated code.
///
/// 62^6 is roughly 5.68e10 combinations.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generates a random code of exactly `length` characters.
///
/// Each character is drawn independently and uniformly from `[A-Za-z0-9]`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns true if `code` has exactly `length` ASCII alphanumeric characters.
#[cfg(test)]
pub(crate) fn is_valid_code(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Source of candidate short codes.
///
/// Implementations don't interact with storage and make no uniqueness
/// promise; collisions are resolved by the caller.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random alphanumeric codes of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code(self.length)
    }
}
