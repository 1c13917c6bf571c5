use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::Result;

/// Tag identifying the serialization schema of a message body.
///
/// Distinct from the route key: the route selects a handler, the payload
/// type names the schema the bytes were encoded against. Defaults to the
/// request type's name via [`PayloadType::of`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayloadType(Arc<str>);

impl PayloadType {
    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Self(tag.into())
    }

    /// Derives the schema tag from the message's Rust type name.
    pub fn of<T>() -> Self {
        Self(Arc::from(std::any::type_name::<T>()))
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PayloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode a message into its wire bytes.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

/// Decode wire bytes against the caller-declared schema.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}
