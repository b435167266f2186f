//! Binding between the host file-watch service and the bridge's coordination
//! loop. One registration is live per open document; opening another document
//! replaces it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{BridgeError, BridgeResult};
use crate::event::BridgeEvent;

pub(crate) struct DocumentWatcher {
    // Held for its side effect; dropping it removes the registration.
    _watcher: RecommendedWatcher,
    forward: JoinHandle<()>,
}

impl DocumentWatcher {
    /// Watches `document`'s directory and posts a [`BridgeEvent::FileChanged`]
    /// for every content change of the document itself.
    ///
    /// The notify callback runs on the watch service's own thread, so it only
    /// filters and pushes onto a flume channel; a forwarding task marshals
    /// the notifications onto the coordination loop, applying the configured
    /// trailing-edge debounce. Callback faults are logged and swallowed; a
    /// panic there would deregister the watch entirely.
    pub(crate) fn install(
        document: &Path,
        events: UnboundedSender<BridgeEvent>,
        debounce: Duration,
    ) -> BridgeResult<Self> {
        let root = document
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| document.to_path_buf());
        let target = document.to_path_buf();

        let (changed_tx, changed_rx) = flume::unbounded::<PathBuf>();
        let mut watcher =
            notify::recommended_watcher(move |outcome: Result<Event, notify::Error>| {
                let event = match outcome {
                    Ok(event) => event,
                    Err(err) => {
                        warn!(%err, "file watch notification failed");
                        return;
                    }
                };
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                if let Some(path) = event.paths.iter().find(|path| path.as_path() == target.as_path()) {
                    let _ = changed_tx.send(path.clone());
                } else {
                    debug!(?event.paths, "change does not touch the open document");
                }
            })
            .map_err(|err| BridgeError::watch(err.to_string()))?;
        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|err| BridgeError::watch(err.to_string()))?;

        let forward = tokio::spawn(forward_changes(changed_rx, events, debounce));
        Ok(Self {
            _watcher: watcher,
            forward,
        })
    }
}

impl Drop for DocumentWatcher {
    fn drop(&mut self) {
        self.forward.abort();
    }
}

async fn forward_changes(
    changed: flume::Receiver<PathBuf>,
    events: UnboundedSender<BridgeEvent>,
    debounce: Duration,
) {
    while let Ok(mut path) = changed.recv_async().await {
        if !debounce.is_zero() {
            // Trailing edge: swallow the burst of a multi-step write and
            // forward once it goes quiet.
            while let Ok(Ok(next)) = tokio::time::timeout(debounce, changed.recv_async()).await {
                path = next;
            }
        }
        if events.send(BridgeEvent::FileChanged { path }).is_err() {
            return;
        }
    }
}
