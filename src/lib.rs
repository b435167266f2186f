//! Bidirectional synchronization bridge between an embedded browser rendering
//! a PDF and the state it displays, kept consistent with the file on disk.
//!
//! The host embeds a browser-based viewer and wires its callbacks to a
//! [`PdfBridge`]: inbound `pageChanged` messages keep the current page number
//! tracked here; changes to the open file reload the surface; a matching
//! load-completion confirms the reload and replays the remembered page via an
//! outgoing `pageSet` message.

pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod registry;
pub mod surface;
pub(crate) mod watch;

pub use bridge::{DocumentHandle, PageState, PdfBridge, ReloadPhase};
pub use config::Config;
pub use error::{BridgeError, BridgeResult};
pub use event::{PAGE_CHANGED, PAGE_SET, PageEventPayload};
pub use registry::SubscriptionRegistry;
pub use surface::{PreviewUrlResolver, RenderSurface};
