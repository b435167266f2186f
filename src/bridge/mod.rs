mod core;
mod event_loop;
mod state;

#[cfg(test)]
mod tests;

pub use event_loop::PdfBridge;
pub use state::{DocumentHandle, PageState, ReloadPhase};
