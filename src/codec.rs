use crate::error::{BridgeError, BridgeResult};
use crate::event::PageEventPayload;

/// Serializes a payload to its wire string form.
pub fn encode(channel: &str, payload: &PageEventPayload) -> BridgeResult<String> {
    serde_json::to_string(payload).map_err(|source| BridgeError::encode(channel, source))
}

/// Parses a wire string back into a payload.
///
/// A malformed payload is a recoverable condition: callers log the error and
/// drop the message, they never let it escape into transport callbacks.
pub fn decode(channel: &str, raw: &str) -> BridgeResult<PageEventPayload> {
    serde_json::from_str(raw).map_err(|source| BridgeError::decode(channel, source))
}
