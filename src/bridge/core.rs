//! Synchronous heart of the bridge, driven by the event loop. Owns the
//! subscription registry, the reload state machine, and the collaborator
//! capabilities; nothing here blocks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{BridgeError, BridgeResult};
use crate::event::{BridgeEvent, PAGE_CHANGED, PAGE_SET, PageEventPayload};
use crate::registry::SubscriptionRegistry;
use crate::surface::{PreviewUrlResolver, RenderSurface};
use crate::watch::DocumentWatcher;

use super::state::{DocumentHandle, PageState, ReloadPhase};

pub(crate) struct BridgeCore {
    config: Config,
    registry: SubscriptionRegistry,
    page: Arc<PageState>,
    surface: Box<dyn RenderSurface>,
    resolver: Box<dyn PreviewUrlResolver>,
    document: Option<DocumentHandle>,
    phase: ReloadPhase,
    watcher: Option<DocumentWatcher>,
    events: UnboundedSender<BridgeEvent>,
}

impl BridgeCore {
    pub(crate) fn new(
        config: Config,
        surface: Box<dyn RenderSurface>,
        resolver: Box<dyn PreviewUrlResolver>,
        page: Arc<PageState>,
        events: UnboundedSender<BridgeEvent>,
    ) -> BridgeResult<Self> {
        let mut registry = SubscriptionRegistry::from_channels([PAGE_CHANGED]);
        let holder = Arc::clone(&page);
        registry.add_handler(PAGE_CHANGED, move |payload| {
            debug!(page_number = payload.page_number, "viewer navigated");
            holder.set(payload.page_number);
        })?;

        Ok(Self {
            config,
            registry,
            page,
            surface,
            resolver,
            document: None,
            phase: ReloadPhase::Unopened,
            watcher: None,
            events,
        })
    }

    /// Drains one coordination-loop event. Returns `false` on shutdown.
    pub(crate) fn handle_event(&mut self, event: BridgeEvent) -> bool {
        match event {
            BridgeEvent::Open { path, reply } => {
                let _ = reply.send(self.open_document(path));
            }
            BridgeEvent::Reload { reply } => {
                let _ = reply.send(self.reload_document());
            }
            BridgeEvent::SetPage(page) => self.set_current_page(page),
            BridgeEvent::Message { channel, raw } => {
                self.registry.dispatch_incoming(&channel, &raw);
            }
            BridgeEvent::LoadFinished { url, status } => self.handle_load_finished(&url, status),
            BridgeEvent::FileChanged { path } => self.handle_file_changed(&path),
            BridgeEvent::Shutdown => return false,
        }
        true
    }

    /// Records the handle, swaps the file-watch registration over to its
    /// path, and kicks off the first load.
    pub(crate) fn open_document(&mut self, path: PathBuf) -> BridgeResult<()> {
        let handle = DocumentHandle::new(path);
        // Replace, never accumulate: a leftover registration for the previous
        // document would keep triggering reloads for it.
        self.watcher = None;
        self.watcher = Some(DocumentWatcher::install(
            handle.path(),
            self.events.clone(),
            Duration::from_millis(self.config.watch.debounce_ms),
        )?);
        info!(path = %handle.path().display(), "document opened");
        self.document = Some(handle);
        self.reload_document()
    }

    /// Resolves the preview URL and instructs the surface to load it. The
    /// remembered page is replayed only once the matching load completion
    /// arrives; reloading wipes the viewer's own navigation state.
    pub(crate) fn reload_document(&mut self) -> BridgeResult<()> {
        let Some(document) = self.document.as_ref() else {
            return Err(BridgeError::NotOpened);
        };
        self.phase = ReloadPhase::Resolving;
        let Some(url) = self.resolver.file_preview_url(document.path()) else {
            self.phase = ReloadPhase::Idle;
            return Err(BridgeError::url_resolution(document.path()));
        };
        let target_url = url.to_string();
        debug!(%target_url, "loading preview");
        self.phase = ReloadPhase::Loading {
            target_url: target_url.clone(),
        };
        self.surface.load_url(&target_url);
        Ok(())
    }

    /// Load-completion handshake. The surface reports every navigation it
    /// finishes, so the loaded URL is compared against the recorded target;
    /// a mismatch is an expected race (stale or unrelated load), not an
    /// error, and leaves the reload unresolved until the right signal lands.
    pub(crate) fn handle_load_finished(&mut self, loaded_url: &str, status: u16) {
        let Some(target_url) = self.phase.target_url().map(str::to_string) else {
            debug!(loaded_url, status, "load completion with no reload pending");
            return;
        };
        self.phase = ReloadPhase::AwaitingConfirmation {
            target_url: target_url.clone(),
        };
        if loaded_url != target_url {
            debug!(loaded_url, %target_url, status, "ignoring stale load completion");
            return;
        }
        debug!(%target_url, status, "document load confirmed, restoring page");
        self.set_current_page(self.page.get());
        self.phase = ReloadPhase::Idle;
    }

    /// Filters watch notifications down to the open document and reloads.
    /// Failures here are logged, never propagated: this sits on the callback
    /// boundary and the notification source must keep running.
    pub(crate) fn handle_file_changed(&mut self, path: &std::path::Path) {
        let Some(document) = self.document.as_ref() else {
            return;
        };
        if document.path() != path {
            debug!(changed = %path.display(), "ignoring change to unrelated file");
            return;
        }
        info!(path = %path.display(), "document changed on disk, reloading");
        if let Err(err) = self.reload_document() {
            warn!(%err, "reload after file change failed");
        }
    }

    /// Single mutation point for the page state; also pushes the new page to
    /// the viewer so programmatic navigation and post-reload restore share
    /// one path.
    pub(crate) fn set_current_page(&mut self, page: u32) {
        self.page.set(page);
        self.registry.trigger_outgoing(
            self.surface.as_ref(),
            &self.config.surface.trigger_function,
            PAGE_SET,
            &PageEventPayload::new(page),
        );
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> &ReloadPhase {
        &self.phase
    }

    #[cfg(test)]
    pub(crate) fn current_page(&self) -> u32 {
        self.page.get()
    }
}
