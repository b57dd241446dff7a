//! Key and value encoding for the sled trees
//!
//! # Types
//!
//! - **`IdKey`**: An id encoded as 8 big-endian bytes, so sled's byte order is id order
//! - **`encode`/`decode`**: bincode (serde mode, standard config) for record values
//! - **`TagValidator::normalize`**: write-side validation of tag names
//!
//! # Examples
//!
//! ```
//! use tagfolio::db::types::{IdKey, TagValidator};
//!
//! let key = IdKey::from(42u64);
//! assert_eq!(IdKey::from_bytes(key.as_bytes()).unwrap().value(), 42);
//!
//! let validator = TagValidator::new().unwrap();
//! assert_eq!(validator.normalize(" beach ").unwrap().as_deref(), Some("beach"));
//! assert!(validator.normalize("beach<>").is_err());
//! ```

use super::error::DbError;
use crate::model::{ResourceId, TagId};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Characters accepted in tag names
pub const TAG_PATTERN: &str = r"^[a-zA-Z0-9%_+.!*',()~-]*$";

/// An id as a sled key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IdKey([u8; 8]);

impl IdKey {
    /// # Errors
    ///
    /// Returns `DbError::CorruptKey` if `bytes` is not exactly 8 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| DbError::CorruptKey(bytes.len()))?;
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

impl From<u64> for IdKey {
    fn from(id: u64) -> Self {
        Self(id.to_be_bytes())
    }
}

impl From<ResourceId> for IdKey {
    fn from(id: ResourceId) -> Self {
        Self::from(id.0)
    }
}

impl From<TagId> for IdKey {
    fn from(id: TagId) -> Self {
        Self::from(id.0)
    }
}

impl AsRef<[u8]> for IdKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encode a record value
///
/// # Errors
///
/// Returns `DbError::EncodeError` if the value cannot be serialized.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, DbError> {
    Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
}

/// Decode a record value
///
/// # Errors
///
/// Returns `DbError::DecodeError` if the bytes do not hold a `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DbError> {
    let (value, _): (T, usize) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}

/// Validator for tag names on write
pub struct TagValidator {
    pattern: Regex,
}

impl TagValidator {
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the tag pattern fails to compile.
    pub fn new() -> Result<Self, DbError> {
        let pattern = Regex::new(TAG_PATTERN).map_err(|e| DbError::InvalidInput(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Trim a raw tag name and check its characters
    ///
    /// Returns `Ok(None)` for names that are empty after trimming; those are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidTag` if the name contains characters outside [`TAG_PATTERN`].
    pub fn normalize(&self, raw: &str) -> Result<Option<String>, DbError> {
        let name = raw.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if !self.pattern.is_match(name) {
            return Err(DbError::InvalidTag(name.to_string()));
        }
        Ok(Some(name.to_string()))
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
