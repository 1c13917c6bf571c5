use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{Result, payload};

/// One in-flight request or response on the wire.
///
/// - `route_key`: which handler within the receiving actor the message
///   targets. Opaque string, no reserved prefixes.
/// - `payload`: the serialized message body.
///
/// Immutable value object; cheap to clone.
#[derive(Debug, Clone)]
pub struct RpcEnvelope {
    route_key: Arc<str>,
    payload: Arc<[u8]>,
}

impl RpcEnvelope {
    pub fn new(route_key: impl Into<Arc<str>>, payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            route_key: route_key.into(),
            payload: payload.into(),
        }
    }

    #[inline]
    pub fn route_key(&self) -> &str {
        &self.route_key
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decode the payload against the caller-declared schema.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        payload::from_bytes(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_typed_payload() {
        let bytes = payload::to_bytes(&("pong".to_string(), 3u32)).unwrap();
        let envelope = RpcEnvelope::new("echo", bytes);
        let (word, n): (String, u32) = envelope.decode().unwrap();
        assert_eq!(word, "pong");
        assert_eq!(n, 3);
    }
}
