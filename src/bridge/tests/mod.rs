mod controller;

use std::path::Path;
use std::sync::{Arc, Mutex};

use url::Url;

use crate::surface::{PreviewUrlResolver, RenderSurface};

#[derive(Default)]
pub(crate) struct FakeSurface {
    pub(crate) loads: Arc<Mutex<Vec<String>>>,
    pub(crate) scripts: Arc<Mutex<Vec<String>>>,
}

impl RenderSurface for FakeSurface {
    fn load_url(&self, url: &str) {
        self.loads.lock().expect("load log poisoned").push(url.to_string());
    }

    fn execute_script(&self, code: &str) {
        self.scripts.lock().expect("script log poisoned").push(code.to_string());
    }
}

pub(crate) struct FakeResolver {
    pub(crate) available: bool,
    pub(crate) calls: Arc<Mutex<usize>>,
}

impl FakeResolver {
    pub(crate) fn new(available: bool) -> Self {
        Self {
            available,
            calls: Arc::new(Mutex::new(0)),
        }
    }
}

impl PreviewUrlResolver for FakeResolver {
    fn file_preview_url(&self, path: &Path) -> Option<Url> {
        *self.calls.lock().expect("call counter poisoned") += 1;
        if !self.available {
            return None;
        }
        let name = path.file_name()?.to_string_lossy();
        Url::parse(&format!("http://localhost:63343/preview/{name}")).ok()
    }
}
