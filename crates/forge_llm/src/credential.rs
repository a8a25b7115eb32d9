//! The secret used to authorize calls to the generation API.

use std::fmt;

use crate::error::{GenerationError, GenerationResult};

/// Prefixes of credential shapes the generation API accepts.
///
/// `AIzaSy` is a Google API key, `ya29.` an OAuth access token.
pub const ACCEPTED_PREFIXES: &[&str] = &["AIzaSy", "ya29."];

/// An API credential.
///
/// Holds the raw value without validating it; shape checks happen right
/// before a request is made so a malformed key can still be stored and
/// corrected later.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw value. Blank input yields `None`.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn has_accepted_shape(&self) -> bool {
        ACCEPTED_PREFIXES.iter().any(|p| self.0.starts_with(p))
    }

    pub fn check_shape(&self) -> GenerationResult<()> {
        if self.has_accepted_shape() {
            Ok(())
        } else {
            Err(GenerationError::malformed_credential())
        }
    }

    /// Masked form safe for display, e.g. `AIza…1234`.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}
