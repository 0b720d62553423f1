use std::sync::Arc;

use tracing::debug;

use crate::host::{HostError, TabHost};
use crate::models::{NO_TAB, TabSnapshot};

/// Fresh view of the host's open tabs.
///
/// Every refresh re-queries the host; nothing is cached between calls.
#[derive(Debug)]
pub struct TabDirectory<H> {
    host: Arc<H>,
}

impl<H> Clone for TabDirectory<H> {
    fn clone(&self) -> Self {
        Self { host: Arc::clone(&self.host) }
    }
}

impl<H: TabHost> TabDirectory<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// All listable tabs in host order (tabs with neither title nor URL, or with
    /// the [`NO_TAB`] id, are skipped)
    pub async fn refresh(&self) -> Result<Vec<TabSnapshot>, HostError> {
        let tabs = self.host.query_all_tabs().await?;
        let total = tabs.len();
        let listable: Vec<TabSnapshot> =
            tabs.into_iter().filter(|tab| tab.id != NO_TAB && tab.is_listable()).collect();
        if listable.len() != total {
            debug!(total, listable = listable.len(), "skipped unlisted tabs");
        }
        Ok(listable)
    }
}
