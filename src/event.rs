use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::BridgeResult;

/// Channel the rendering surface emits when the user navigates inside the viewer.
pub const PAGE_CHANGED: &str = "pageChanged";
/// Channel the bridge emits to move the viewer to a remembered page.
pub const PAGE_SET: &str = "pageSet";

/// Wire payload carried on both page channels.
///
/// Produced by the surface (user-driven navigation) and by the reload
/// controller (programmatic restore). Carries no other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEventPayload {
    pub page_number: u32,
}

impl PageEventPayload {
    pub fn new(page_number: u32) -> Self {
        Self { page_number }
    }
}

/// Messages drained by the single-owner coordination loop.
///
/// Every external callback source (surface load completions, file-change
/// notifications, public API calls) posts one of these instead of touching
/// shared state directly.
#[derive(Debug)]
pub(crate) enum BridgeEvent {
    Open {
        path: PathBuf,
        reply: oneshot::Sender<BridgeResult<()>>,
    },
    Reload {
        reply: oneshot::Sender<BridgeResult<()>>,
    },
    SetPage(u32),
    Message {
        channel: String,
        raw: String,
    },
    LoadFinished {
        url: String,
        status: u16,
    },
    FileChanged {
        path: PathBuf,
    },
    Shutdown,
}
