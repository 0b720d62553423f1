//! In-memory [`TabHost`] backed by a tab list, optionally loaded from JSON.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::{HostError, TabHost};
use crate::models::{TabId, TabSnapshot, WindowId};

#[derive(Debug, Default)]
pub struct MemoryTabHost {
    tabs: Mutex<Vec<TabSnapshot>>,
    activations: Mutex<Option<mpsc::UnboundedSender<TabId>>>,
    switcher_opened: AtomicUsize,
}

impl MemoryTabHost {
    pub fn new(tabs: Vec<TabSnapshot>) -> Self {
        Self { tabs: Mutex::new(tabs), ..Self::default() }
    }

    /// Load a JSON array of tab snapshots
    pub fn from_json_file(path: &Path) -> Result<Self, HostError> {
        Ok(Self::new(load_tabs(path)?))
    }

    /// Subscribe to activation notifications.
    ///
    /// Only one subscriber is kept; subscribing again replaces it.
    pub fn subscribe_activations(&self) -> mpsc::UnboundedReceiver<TabId> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.activations.lock() = Some(tx);
        rx
    }

    /// Report an activation that happened outside the switcher (user click, shortcut)
    pub fn notify_activated(&self, tab_id: TabId) {
        if let Some(tx) = self.activations.lock().as_ref()
            && tx.send(tab_id).is_err()
        {
            debug!(tab_id, "activation subscriber is gone");
        }
    }

    pub fn insert_tab(&self, tab: TabSnapshot) {
        self.tabs.lock().push(tab);
    }

    pub fn tabs(&self) -> Vec<TabSnapshot> {
        self.tabs.lock().clone()
    }

    pub fn switcher_open_count(&self) -> usize {
        self.switcher_opened.load(Ordering::Relaxed)
    }
}

impl TabHost for MemoryTabHost {
    async fn query_all_tabs(&self) -> Result<Vec<TabSnapshot>, HostError> {
        Ok(self.tabs.lock().clone())
    }

    async fn activate_tab(&self, tab_id: TabId, window_id: WindowId) -> Result<(), HostError> {
        let known = self.tabs.lock().iter().any(|tab| tab.id == tab_id);
        if !known {
            return Err(HostError::TabNotFound(tab_id));
        }
        debug!(tab_id, window_id, "activating tab");
        self.notify_activated(tab_id);
        Ok(())
    }

    async fn close_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut tabs = self.tabs.lock();
        let before = tabs.len();
        tabs.retain(|tab| tab.id != tab_id);
        if tabs.len() == before {
            return Err(HostError::TabNotFound(tab_id));
        }
        Ok(())
    }

    async fn open_switcher(&self) -> Result<(), HostError> {
        self.switcher_opened.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

pub fn load_tabs(path: &Path) -> Result<Vec<TabSnapshot>, HostError> {
    let content = fs::read_to_string(path)
        .map_err(|source| HostError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| HostError::Parse { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn host() -> MemoryTabHost {
        MemoryTabHost::new(vec![
            TabSnapshot::new(1, 1).with_title("One"),
            TabSnapshot::new(2, 1).with_title("Two"),
        ])
    }

    #[tokio::test]
    async fn test_close_tab_removes() {
        let host = host();
        host.close_tab(1).await.unwrap();
        let ids: Vec<_> = host.query_all_tabs().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_close_unknown_tab_fails() {
        let result = host().close_tab(42).await;
        assert!(matches!(result, Err(HostError::TabNotFound(42))));
    }

    #[tokio::test]
    async fn test_activate_notifies_subscriber() {
        let host = host();
        let mut rx = host.subscribe_activations();
        host.activate_tab(2, 1).await.unwrap();
        assert_eq!(rx.recv().await, Some(2));
        assert!(host.activate_tab(7, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_open_switcher_counts() {
        let host = host();
        host.open_switcher().await.unwrap();
        host.open_switcher().await.unwrap();
        assert_eq!(host.switcher_open_count(), 2);
    }

    #[test]
    fn test_load_tabs_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id":1,"windowId":1,"title":"A"}},{{"id":2,"windowId":2}}]"#).unwrap();
        let tabs = load_tabs(file.path()).unwrap();
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn test_load_tabs_errors() {
        let missing = load_tabs(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(HostError::Read { .. })));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(load_tabs(file.path()), Err(HostError::Parse { .. })));
    }
}
