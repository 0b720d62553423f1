//! Browser host collaborator.
//!
//! The switcher never talks to browser APIs directly; everything it needs
//! from the host goes through [`TabHost`].

pub mod memory;

use std::future::Future;
use std::path::PathBuf;

pub use memory::MemoryTabHost;
use thiserror::Error;

use crate::models::{TabId, TabSnapshot, WindowId};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("tab {0} not found")]
    TabNotFound(TabId),
    #[error("host unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read tabs from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tabs from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Tab and window operations provided by the browser.
///
/// Activation notifications are delivered separately, as a stream of tab ids
/// the host process feeds into its recency log.
pub trait TabHost: Send + Sync + 'static {
    /// Every open tab, in the host's own order
    fn query_all_tabs(&self) -> impl Future<Output = Result<Vec<TabSnapshot>, HostError>> + Send;

    /// Make `tab_id` the active tab and focus its window
    fn activate_tab(
        &self,
        tab_id: TabId,
        window_id: WindowId,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    fn close_tab(&self, tab_id: TabId) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Show the switcher surface (keyboard shortcut target)
    fn open_switcher(&self) -> impl Future<Output = Result<(), HostError>> + Send;
}
