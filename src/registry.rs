//! Subscription registry for the typed message channel between the rendering
//! surface and the bridge.
//!
//! The registry is constructed with a fixed, closed set of recognized channel
//! names — an allow-list of the events the host surface is permitted to emit.
//! Handlers for one channel run in registration order; undecodable or
//! unrecognized inbound messages are logged and dropped.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::codec;
use crate::error::{BridgeError, BridgeResult};
use crate::event::PageEventPayload;
use crate::surface::RenderSurface;

type Handler = Box<dyn FnMut(&PageEventPayload) + Send>;

pub struct SubscriptionRegistry {
    channels: HashMap<String, Vec<Handler>>,
}

impl SubscriptionRegistry {
    pub fn from_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: channels
                .into_iter()
                .map(|name| (name.into(), Vec::new()))
                .collect(),
        }
    }

    /// Registers a handler for a declared channel.
    ///
    /// Fails with [`BridgeError::ChannelUnknown`] for channels outside the
    /// allow-list; that is a configuration fault, not a runtime condition.
    pub fn add_handler(
        &mut self,
        channel: &str,
        handler: impl FnMut(&PageEventPayload) + Send + 'static,
    ) -> BridgeResult<()> {
        let handlers = self
            .channels
            .get_mut(channel)
            .ok_or_else(|| BridgeError::channel_unknown(channel))?;
        handlers.push(Box::new(handler));
        Ok(())
    }

    /// Decodes an inbound wire message and fans it out to the channel's
    /// handlers in registration order.
    ///
    /// The transport is untrusted: messages on undeclared channels and
    /// messages that fail to decode are dropped here, never propagated.
    /// Duplicate delivery of an identical message is possible and handlers
    /// must tolerate it.
    pub fn dispatch_incoming(&mut self, channel: &str, raw: &str) {
        let Some(handlers) = self.channels.get_mut(channel) else {
            warn!(channel, "dropping message for unrecognized channel");
            return;
        };
        let payload = match codec::decode(channel, raw) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(channel, %err, "dropping undecodable message");
                return;
            }
        };
        debug!(channel, page_number = payload.page_number, "dispatching");
        for handler in handlers.iter_mut() {
            handler(&payload);
        }
    }

    /// Encodes a payload and hands it to the surface's script-execution
    /// capability, addressed by channel name. Fire-and-forget: no
    /// acknowledgement is awaited and delivery failures surface only as the
    /// viewer not reacting.
    pub fn trigger_outgoing(
        &self,
        surface: &dyn RenderSurface,
        trigger_function: &str,
        channel: &str,
        payload: &PageEventPayload,
    ) {
        let json = match codec::encode(channel, payload) {
            Ok(json) => json,
            Err(err) => {
                warn!(channel, %err, "skipping outgoing message");
                return;
            }
        };
        surface.execute_script(&format!("{trigger_function}('{channel}', {json})"));
    }
}
