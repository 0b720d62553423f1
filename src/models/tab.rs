use serde::{Deserialize, Serialize};
use url::Url;

/// Host-assigned tab identity.
pub type TabId = u64;
/// The host's "no tab" id; never listed or recorded.
pub const NO_TAB: TabId = 0;
/// Host-assigned window identity.
pub type WindowId = u64;

/// A single open tab as reported by the host at refresh time.
///
/// Title and URL are optional because the host reports tabs that are still
/// loading (or privileged pages) with neither populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: TabId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub window_id: WindowId,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl TabSnapshot {
    pub fn new(id: TabId, window_id: WindowId) -> Self {
        Self { id, title: None, url: None, window_id, pinned: false, favicon: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Title, or the empty string when the host did not report one
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Hostname of the tab's URL, lowercased by the URL parser.
    ///
    /// Returns `None` for missing or unparseable URLs and for URLs without a
    /// host component (`about:blank`, `data:` and the like).
    pub fn hostname(&self) -> Option<String> {
        let url = Url::parse(self.url.as_deref()?).ok()?;
        url.host_str().map(str::to_owned)
    }

    /// True for tabs served over http or https
    pub fn is_web(&self) -> bool {
        self.url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    /// Tabs with neither a title nor a URL are not surfaced to the switcher
    pub fn is_listable(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.title) || present(&self.url)
    }
}
