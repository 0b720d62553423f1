//! The long-lived host process.
//!
//! [`SwitcherHost`] owns the recency log and answers the switcher's rpc
//! requests. It also runs the two background tasks: the activation feed that
//! appends to the log, and the periodic compaction tick.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use crate::channel::{Port, Responder, Router};
use crate::directory::TabDirectory;
use crate::host::{HostError, TabHost};
use crate::models::{NO_TAB, TabId, TabSnapshot};
use crate::ordering::OrderingService;
use crate::recency::{RecencyLog, SharedRecencyLog};

/// Rpc method: ordered tab list
pub const LIST_TABS: &str = "listTabs";
/// Rpc method: close a tab, answered with the new ordered tab list
pub const CLOSE_TAB: &str = "closeTab";

/// Arguments of [`CLOSE_TAB`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseTabArgs {
    #[serde(rename = "tabID")]
    pub tab_id: TabId,
}

/// Keyboard commands the host process responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenTabSwitcher,
}

impl Command {
    pub const ALL: [Command; 1] = [Command::OpenTabSwitcher];

    pub fn name(self) -> &'static str {
        match self {
            Command::OpenTabSwitcher => "openTabSwitcher",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unmapped command: {0}")]
    Unmapped(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

pub struct SwitcherHost<H> {
    log: SharedRecencyLog,
    ordering: OrderingService<H>,
    host: Arc<H>,
}

impl<H> Clone for SwitcherHost<H> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            ordering: self.ordering.clone(),
            host: Arc::clone(&self.host),
        }
    }
}

impl<H> std::fmt::Debug for SwitcherHost<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitcherHost").field("log_len", &self.log.lock().len()).finish()
    }
}

impl<H: TabHost> SwitcherHost<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self::with_log(host, RecencyLog::new().into_shared())
    }

    pub fn with_log(host: Arc<H>, log: SharedRecencyLog) -> Self {
        let ordering = OrderingService::new(Arc::clone(&log), TabDirectory::new(Arc::clone(&host)));
        Self { log, ordering, host }
    }

    pub fn log(&self) -> &SharedRecencyLog {
        &self.log
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Append an activation; id 0 is the host's "no tab" and is ignored
    pub fn record_activation(&self, tab_id: TabId) {
        if tab_id == NO_TAB {
            trace!("ignoring activation without a tab");
            return;
        }
        self.log.lock().record_activation(tab_id);
    }

    /// One compaction tick; returns the number of events removed
    pub fn compact(&self) -> usize {
        self.log.lock().compact()
    }

    pub async fn ordered_tabs(&self) -> Result<Vec<TabSnapshot>, HostError> {
        self.ordering.ordered_tabs().await
    }

    /// Close `tab_id` and return the ordering without it
    pub async fn close_tab(&self, tab_id: TabId) -> Result<Vec<TabSnapshot>, HostError> {
        self.host.close_tab(tab_id).await?;
        self.ordered_tabs().await
    }

    /// Rpc routes served to switcher sessions
    pub fn router(&self) -> Router {
        let list = self.clone();
        let close = self.clone();

        Router::new()
            .route(LIST_TABS, move |_| {
                let host = list.clone();
                async move { to_value(host.ordered_tabs().await.map_err(|e| e.to_string())?) }
            })
            .route(CLOSE_TAB, move |args| {
                let host = close.clone();
                async move {
                    let args: CloseTabArgs = parse_args(CLOSE_TAB, args)?;
                    to_value(host.close_tab(args.tab_id).await.map_err(|e| e.to_string())?)
                }
            })
    }

    /// Answer requests from one switcher session until it disconnects
    pub async fn serve(&self, port: Port) {
        Responder::new(self.router()).serve(port).await;
    }

    /// Compact the log every `period`. The first tick fires immediately.
    pub fn spawn_compaction(&self, period: Duration) -> JoinHandle<()> {
        let log = Arc::clone(&self.log);
        tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                log.lock().compact();
            }
        })
    }

    /// Feed host activation notifications into the log until the sender closes
    pub fn spawn_activation_feed(
        &self,
        mut activations: mpsc::UnboundedReceiver<TabId>,
    ) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            while let Some(tab_id) = activations.recv().await {
                this.record_activation(tab_id);
            }
            debug!("activation feed closed");
        })
    }

    pub async fn run_command(&self, name: &str) -> Result<(), CommandError> {
        match Command::from_name(name) {
            Some(Command::OpenTabSwitcher) => {
                self.host.open_switcher().await?;
                info!(command = name, "opened tab switcher");
                Ok(())
            }
            None => Err(CommandError::Unmapped(name.to_string())),
        }
    }

    /// Keyboard shortcut entry point; failures are logged, never propagated
    pub async fn handle_command(&self, name: &str) {
        match self.run_command(name).await {
            Ok(()) => {}
            Err(err @ CommandError::Unmapped(_)) => warn!(error = %err, "command ignored"),
            Err(err) => error!(command = name, error = %err, "command failed"),
        }
    }
}

fn parse_args<T: DeserializeOwned>(method: &str, args: Option<Value>) -> Result<T, String> {
    serde_json::from_value(args.unwrap_or(Value::Null))
        .map_err(|err| format!("invalid {} arguments: {}", method, err))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|err| err.to_string())
}
