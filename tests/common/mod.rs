//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use tabhop::background::SwitcherHost;
use tabhop::channel::Port;
use tabhop::host::MemoryTabHost;
use tabhop::models::{TabId, TabSnapshot};
use tabhop::session::{SessionOptions, SwitcherClient, SwitcherSession};
use tempfile::NamedTempFile;

/// Builder for tab lists
#[derive(Default)]
pub struct TabsBuilder {
    tabs: Vec<TabSnapshot>,
}

impl TabsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a web tab in window 1
    pub fn web(self, id: TabId, title: &str, url: &str) -> Self {
        self.tab(TabSnapshot::new(id, 1).with_title(title).with_url(url))
    }

    pub fn pinned(self, id: TabId, title: &str, url: &str) -> Self {
        self.tab(TabSnapshot::new(id, 1).with_title(title).with_url(url).pinned(true))
    }

    pub fn tab(mut self, tab: TabSnapshot) -> Self {
        self.tabs.push(tab);
        self
    }

    pub fn build(self) -> Vec<TabSnapshot> {
        self.tabs
    }

    /// Write the tabs as a JSON array the CLI can load
    pub fn write_json(self) -> NamedTempFile {
        let file = NamedTempFile::new().expect("Failed to create temp file");
        let json = serde_json::to_string(&self.tabs).expect("Failed to encode tabs");
        std::fs::write(file.path(), json).expect("Failed to write tabs");
        file
    }
}

/// A realistic window: mail, code hosting, docs, a settings page and a pinned chat
pub fn sample_tabs() -> Vec<TabSnapshot> {
    TabsBuilder::new()
        .web(1, "Inbox - Mail", "https://mail.example.com/inbox")
        .web(2, "rust-lang/rust: Empowering everyone", "https://github.com/rust-lang/rust")
        .web(3, "std::collections - Rust", "https://doc.rust-lang.org/std/collections")
        .tab(TabSnapshot::new(4, 2).with_title("Settings").with_url("chrome://settings"))
        .pinned(5, "Team chat", "https://chat.example.com")
        .build()
}

pub fn ids(tabs: &[TabSnapshot]) -> Vec<TabId> {
    tabs.iter().map(|tab| tab.id).collect()
}

/// Host process plus a connected session, wired through an in-process port
pub async fn connected_session(
    tabs: Vec<TabSnapshot>,
    recent: &[TabId],
) -> (SwitcherHost<MemoryTabHost>, SwitcherSession<MemoryTabHost>) {
    let host = Arc::new(MemoryTabHost::new(tabs));
    let switcher = SwitcherHost::new(Arc::clone(&host));
    for &id in recent.iter().rev() {
        switcher.record_activation(id);
    }

    let (session_end, host_end) = Port::pair();
    let server = switcher.clone();
    tokio::spawn(async move { server.serve(host_end).await });

    let client = SwitcherClient::connect(session_end);
    let session = SwitcherSession::open(client, host, SessionOptions::default())
        .await
        .expect("Failed to open session");
    (switcher, session)
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not utf-8")
}
