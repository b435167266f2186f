use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies the open file. Set once per open session and replaced wholesale
/// when a different document is opened; the preview URL is derived on demand,
/// never stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    path: PathBuf,
}

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Single source of truth for the current page number.
///
/// The inbound page-changed handler and the reload controller's restore step
/// are the only writers; the host UI only reads. Atomic so the read side can
/// live outside the coordination loop.
#[derive(Debug, Default)]
pub struct PageState {
    page: AtomicU32,
}

impl PageState {
    pub fn get(&self) -> u32 {
        self.page.load(Ordering::Relaxed)
    }

    pub fn set(&self, page: u32) {
        self.page.store(page, Ordering::Relaxed);
    }
}

/// Lifecycle of the reload controller.
///
/// `Unopened` is explicit so operations before the first open fail with a
/// defined error instead of tripping over an uninitialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadPhase {
    Unopened,
    Idle,
    Resolving,
    Loading { target_url: String },
    AwaitingConfirmation { target_url: String },
}

impl ReloadPhase {
    /// Target URL of the in-flight reload, if one is pending confirmation.
    pub fn target_url(&self) -> Option<&str> {
        match self {
            Self::Loading { target_url } | Self::AwaitingConfirmation { target_url } => {
                Some(target_url)
            }
            Self::Unopened | Self::Idle | Self::Resolving => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
