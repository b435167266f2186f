use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::{BridgeError, BridgeResult};
use crate::event::BridgeEvent;
use crate::surface::{PreviewUrlResolver, RenderSurface};

use super::core::BridgeCore;
use super::state::PageState;

/// Handle to the bridge's single-owner coordination loop.
///
/// All mutation happens inside one spawned task that owns the [`BridgeCore`];
/// the handle's methods post messages onto its channel. Load-completion and
/// inbound surface messages arrive from foreign callback contexts, so the
/// host wires those callbacks to the `notify_*` methods, which are safe to
/// call from any thread.
pub struct PdfBridge {
    events: UnboundedSender<BridgeEvent>,
    page: Arc<PageState>,
    task: JoinHandle<()>,
}

impl PdfBridge {
    /// Spawns the coordination loop over the given collaborator capabilities.
    ///
    /// Must be called inside a tokio runtime. Fails only on a configuration
    /// fault while wiring the built-in channel handlers.
    pub fn spawn(
        config: Config,
        surface: Box<dyn RenderSurface>,
        resolver: Box<dyn PreviewUrlResolver>,
    ) -> BridgeResult<Self> {
        let (events, mut inbox) = unbounded_channel();
        let page = Arc::new(PageState::default());
        let mut core = BridgeCore::new(
            config,
            surface,
            resolver,
            Arc::clone(&page),
            events.clone(),
        )?;
        let task = tokio::spawn(async move {
            while let Some(event) = inbox.recv().await {
                if !core.handle_event(event) {
                    break;
                }
            }
        });
        Ok(Self { events, page, task })
    }

    pub async fn open_document(&self, path: impl Into<PathBuf>) -> BridgeResult<()> {
        let (reply, response) = oneshot::channel();
        self.send(BridgeEvent::Open {
            path: path.into(),
            reply,
        })?;
        response.await.map_err(|_| BridgeError::ChannelClosed)?
    }

    pub async fn reload_document(&self) -> BridgeResult<()> {
        let (reply, response) = oneshot::channel();
        self.send(BridgeEvent::Reload { reply })?;
        response.await.map_err(|_| BridgeError::ChannelClosed)?
    }

    pub fn current_page_number(&self) -> u32 {
        self.page.get()
    }

    pub fn set_current_page_number(&self, page: u32) {
        let _ = self.events.send(BridgeEvent::SetPage(page));
    }

    /// Inbound structured message from the rendering surface.
    pub fn notify_message(&self, channel: impl Into<String>, raw: impl Into<String>) {
        let _ = self.events.send(BridgeEvent::Message {
            channel: channel.into(),
            raw: raw.into(),
        });
    }

    /// The surface finished a navigation; `status` is its HTTP status code.
    pub fn notify_load_finished(&self, loaded_url: impl Into<String>, status: u16) {
        let _ = self.events.send(BridgeEvent::LoadFinished {
            url: loaded_url.into(),
            status,
        });
    }

    pub fn shutdown(&self) {
        let _ = self.events.send(BridgeEvent::Shutdown);
    }

    fn send(&self, event: BridgeEvent) -> BridgeResult<()> {
        self.events
            .send(event)
            .map_err(|_| BridgeError::ChannelClosed)
    }
}

impl Drop for PdfBridge {
    fn drop(&mut self) {
        self.task.abort();
    }
}
