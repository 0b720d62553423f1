//! The transient switcher session.
//!
//! A session opens by asking the host process for the ordered tab list, then
//! re-evaluates the query locally on every keystroke. Only closing a tab goes
//! back over the channel; activation talks to the tab provider directly.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::background::{CLOSE_TAB, CloseTabArgs, LIST_TABS};
use crate::channel::{CorrelationChannel, Port, RpcError};
use crate::cursor::SelectionCursor;
use crate::host::{HostError, TabHost};
use crate::models::{RankedResult, TabId, TabSnapshot};
use crate::query::{FuzzyOptions, QueryEngine};

pub const DEFAULT_MAX_QUERY_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Typed requester for the host process routes
#[derive(Debug)]
pub struct SwitcherClient {
    channel: CorrelationChannel,
}

impl SwitcherClient {
    pub fn new(channel: CorrelationChannel) -> Self {
        Self { channel }
    }

    pub fn connect(port: Port) -> Self {
        Self::new(CorrelationChannel::open(port))
    }

    pub fn channel(&self) -> &CorrelationChannel {
        &self.channel
    }

    pub async fn list_tabs(&self) -> Result<Vec<TabSnapshot>, RpcError> {
        self.channel.call(LIST_TABS, None).await
    }

    /// Close `tab_id`; resolves with the host's ordering after the close
    pub async fn close_tab(&self, tab_id: TabId) -> Result<Vec<TabSnapshot>, RpcError> {
        let args = serde_json::to_value(CloseTabArgs { tab_id }).map_err(RpcError::Encode)?;
        self.channel.call(CLOSE_TAB, Some(args)).await
    }

    pub fn close(&self) {
        self.channel.close();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Longer queries are truncated, counted in chars
    pub max_query_len: usize,
    pub fuzzy: FuzzyOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { max_query_len: DEFAULT_MAX_QUERY_LEN, fuzzy: FuzzyOptions::default() }
    }
}

#[derive(Debug)]
pub struct SwitcherSession<H> {
    client: SwitcherClient,
    host: Arc<H>,
    engine: QueryEngine,
    max_query_len: usize,
    tabs: Vec<TabSnapshot>,
    query: String,
    results: Vec<RankedResult>,
    cursor: SelectionCursor,
}

impl<H: TabHost> SwitcherSession<H> {
    /// Fetch the ordered tab list and show it unfiltered
    pub async fn open(
        client: SwitcherClient,
        host: Arc<H>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let tabs = client.list_tabs().await?;
        debug!(tabs = tabs.len(), "switcher session opened");

        let mut session = Self {
            client,
            host,
            engine: QueryEngine::new(options.fuzzy),
            max_query_len: options.max_query_len,
            tabs,
            query: String::new(),
            results: Vec::new(),
            cursor: SelectionCursor::new(),
        };
        session.reevaluate();
        Ok(session)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tabs(&self) -> &[TabSnapshot] {
        &self.tabs
    }

    pub fn results(&self) -> &[RankedResult] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn selected(&self) -> Option<&RankedResult> {
        self.results.get(self.cursor.index())
    }

    /// Replace the query; the selection goes back to the first result
    pub fn set_query(&mut self, query: &str) {
        let query = truncate_chars(query, self.max_query_len);
        if query == self.query {
            return;
        }
        self.query.clear();
        self.query.push_str(query);
        self.query_changed();
    }

    /// Append one char; returns false when the query is already at its limit
    pub fn push_char(&mut self, c: char) -> bool {
        if self.query.chars().count() >= self.max_query_len {
            return false;
        }
        self.query.push(c);
        self.query_changed();
        true
    }

    pub fn pop_char(&mut self) -> bool {
        if self.query.pop().is_none() {
            return false;
        }
        self.query_changed();
        true
    }

    pub fn clear_query(&mut self) {
        self.set_query("");
    }

    pub fn select_next(&mut self) {
        self.cursor.next();
        self.cursor.clamp(self.results.len());
    }

    pub fn select_prev(&mut self) {
        self.cursor.prev();
        self.cursor.clamp(self.results.len());
    }

    /// Focus the selected tab and its window.
    ///
    /// Returns the activated id, meaning the session is done and should close;
    /// `None` when nothing is selected.
    pub async fn activate_selected(&self) -> Result<Option<TabId>, SessionError> {
        let Some(selected) = self.selected() else {
            return Ok(None);
        };
        let tab = &selected.tab;
        self.host.activate_tab(tab.id, tab.window_id).await?;
        debug!(tab_id = tab.id, "activated selected tab");
        Ok(Some(tab.id))
    }

    /// Close the selected tab through the host process and show its new ordering
    pub async fn close_selected(&mut self) -> Result<Option<TabId>, SessionError> {
        let Some(tab_id) = self.selected().map(|result| result.tab.id) else {
            return Ok(None);
        };
        self.tabs = self.client.close_tab(tab_id).await?;
        self.reevaluate();
        Ok(Some(tab_id))
    }

    /// Tear the session down, abandoning any in-flight request
    pub fn close(self) {
        self.client.close();
    }

    fn query_changed(&mut self) {
        self.cursor.reset();
        self.reevaluate();
    }

    fn reevaluate(&mut self) {
        self.results = self.engine.evaluate(&self.tabs, &self.query);
        self.cursor.clamp(self.results.len());
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
