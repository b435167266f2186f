use std::path::Path;

use url::Url;

/// Capabilities of the embedded browser control hosting the viewer web UI.
///
/// Both calls are fire-and-forget: navigation and script effects complete out
/// of band and are reported back through the bridge's notification methods.
pub trait RenderSurface: Send {
    fn load_url(&self, url: &str);
    fn execute_script(&self, code: &str);
}

/// Maps a local file path to an externally loadable preview URL.
///
/// Injected into the bridge at construction; `None` means no server instance
/// is available or the path cannot be served.
pub trait PreviewUrlResolver: Send {
    fn file_preview_url(&self, path: &Path) -> Option<Url>;
}
