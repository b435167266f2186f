use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::timeout;

use super::{FakeResolver, FakeSurface};
use crate::bridge::core::BridgeCore;
use crate::bridge::state::{PageState, ReloadPhase};
use crate::config::Config;
use crate::error::BridgeError;
use crate::event::{BridgeEvent, PAGE_CHANGED};

struct Rig {
    core: BridgeCore,
    loads: Arc<Mutex<Vec<String>>>,
    scripts: Arc<Mutex<Vec<String>>>,
    resolver_calls: Arc<Mutex<usize>>,
    changes: UnboundedReceiver<BridgeEvent>,
}

fn rig(resolver_available: bool) -> Rig {
    let (events, changes) = unbounded_channel();
    let surface = FakeSurface::default();
    let loads = Arc::clone(&surface.loads);
    let scripts = Arc::clone(&surface.scripts);
    let resolver = FakeResolver::new(resolver_available);
    let resolver_calls = Arc::clone(&resolver.calls);
    let core = BridgeCore::new(
        Config::default(),
        Box::new(surface),
        Box::new(resolver),
        Arc::new(PageState::default()),
        events,
    )
    .expect("built-in channels should wire up");
    Rig {
        core,
        loads,
        scripts,
        resolver_calls,
        changes,
    }
}

impl Rig {
    fn loads(&self) -> Vec<String> {
        self.loads.lock().expect("load log poisoned").clone()
    }

    fn scripts(&self) -> Vec<String> {
        self.scripts.lock().expect("script log poisoned").clone()
    }

    fn clear_scripts(&self) {
        self.scripts.lock().expect("script log poisoned").clear();
    }
}

#[tokio::test]
async fn restore_after_reload_replays_remembered_page() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let document = dir.path().join("report.pdf");
    fs::write(&document, b"v1").expect("document should be written");

    let mut rig = rig(true);
    rig.core
        .open_document(document.clone())
        .expect("open should resolve and load");
    assert_eq!(rig.loads().len(), 1);

    rig.core.set_current_page(7);
    assert_eq!(rig.core.current_page(), 7);
    rig.clear_scripts();

    // Content change on the open document's path kicks off a reload.
    rig.core.handle_file_changed(&document);
    let loads = rig.loads();
    assert_eq!(loads.len(), 2);
    let target = loads.last().expect("reload should request a URL").clone();

    rig.core.handle_load_finished(&target, 200);
    assert_eq!(
        rig.scripts(),
        [r#"triggerMessageEvent('pageSet', {"pageNumber":7})"#]
    );
    assert_eq!(rig.core.phase(), &ReloadPhase::Idle);
}

#[tokio::test]
async fn stale_load_completion_is_ignored_until_the_target_arrives() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let document = dir.path().join("report.pdf");
    fs::write(&document, b"v1").expect("document should be written");

    let mut rig = rig(true);
    rig.core
        .open_document(document)
        .expect("open should resolve and load");
    let target = rig.loads().pop().expect("open should request a URL");
    rig.clear_scripts();

    rig.core
        .handle_load_finished("http://localhost:63343/preview/other.pdf", 200);
    assert!(rig.scripts().is_empty(), "stale completion must not restore");
    assert_eq!(
        rig.core.phase(),
        &ReloadPhase::AwaitingConfirmation {
            target_url: target.clone()
        }
    );

    // The intended load eventually completes and restoration goes through.
    rig.core.handle_load_finished(&target, 200);
    assert_eq!(rig.scripts().len(), 1);
    assert_eq!(rig.core.phase(), &ReloadPhase::Idle);
}

#[tokio::test]
async fn unrelated_file_change_triggers_no_reload() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let document = dir.path().join("report.pdf");
    let other = dir.path().join("notes.txt");
    fs::write(&document, b"v1").expect("document should be written");

    let mut rig = rig(true);
    rig.core
        .open_document(document)
        .expect("open should resolve and load");
    assert_eq!(*rig.resolver_calls.lock().expect("call counter poisoned"), 1);

    rig.core.handle_file_changed(&other);
    assert_eq!(rig.loads().len(), 1, "no second load may be requested");
    assert_eq!(*rig.resolver_calls.lock().expect("call counter poisoned"), 1);
}

#[tokio::test]
async fn resolution_failure_is_fatal_and_never_touches_the_surface() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let document = dir.path().join("report.pdf");
    fs::write(&document, b"v1").expect("document should be written");

    let mut rig = rig(false);
    let err = rig
        .core
        .open_document(document)
        .expect_err("open should fail without a resolvable URL");
    assert!(matches!(err, BridgeError::UrlResolution { .. }));
    assert!(rig.loads().is_empty(), "load_url must never be invoked");

    let err = rig
        .core
        .reload_document()
        .expect_err("retrying changes nothing");
    assert!(matches!(err, BridgeError::UrlResolution { .. }));
    assert!(rig.loads().is_empty());
}

#[test]
fn reload_before_any_open_is_a_defined_error() {
    let mut rig = rig(true);
    assert_eq!(rig.core.phase(), &ReloadPhase::Unopened);
    let err = rig
        .core
        .reload_document()
        .expect_err("no document is open yet");
    assert!(matches!(err, BridgeError::NotOpened));
    assert!(rig.loads().is_empty());
}

#[test]
fn inbound_page_change_updates_the_holder_without_echoing() {
    let mut rig = rig(true);
    rig.core.handle_event(BridgeEvent::Message {
        channel: PAGE_CHANGED.to_string(),
        raw: r#"{"pageNumber":3}"#.to_string(),
    });
    assert_eq!(rig.core.current_page(), 3);
    assert!(
        rig.scripts().is_empty(),
        "user navigation must not be echoed back to the viewer"
    );
}

#[tokio::test]
async fn reopening_replaces_the_watch_registration() {
    let first_dir = tempfile::tempdir().expect("temp dir should be created");
    let second_dir = tempfile::tempdir().expect("temp dir should be created");
    let first = first_dir
        .path()
        .canonicalize()
        .expect("temp dir should resolve")
        .join("a.pdf");
    let second = second_dir
        .path()
        .canonicalize()
        .expect("temp dir should resolve")
        .join("b.pdf");
    fs::write(&first, b"v1").expect("first document should be written");
    fs::write(&second, b"v1").expect("second document should be written");

    let mut rig = rig(true);
    rig.core
        .open_document(first.clone())
        .expect("first open should succeed");

    fs::write(&first, b"v2").expect("first document should be rewritten");
    let event = timeout(Duration::from_secs(5), rig.changes.recv())
        .await
        .expect("watched change should arrive")
        .expect("event channel should stay open");
    assert!(matches!(event, BridgeEvent::FileChanged { ref path } if *path == first));

    // Let the burst from the first write settle before switching documents.
    while let Ok(Some(_)) = timeout(Duration::from_millis(300), rig.changes.recv()).await {}

    rig.core
        .open_document(second)
        .expect("second open should succeed");
    fs::write(&first, b"v3").expect("first document should be rewritten again");
    let leftover = timeout(Duration::from_millis(700), rig.changes.recv()).await;
    assert!(
        leftover.is_err(),
        "the old registration must be gone, got {leftover:?}"
    );
}
