//! tabhop - keyboard-driven switching between open browser tabs
//!
//! The crate has two halves that talk over an asynchronous message channel:
//!
//! - The long-lived host process ([`background::SwitcherHost`]) records tab
//!   activations in a [`recency::RecencyLog`], compacts it periodically and
//!   answers `listTabs` / `closeTab` requests with the tabs in
//!   most-recently-used order.
//! - The transient switcher ([`session::SwitcherSession`]) fetches that list,
//!   filters and ranks it against the live query ([`query`]) and tracks the
//!   keyboard selection ([`cursor::SelectionCursor`]).
//!
//! Browser APIs are reached only through the [`host::TabHost`] trait.
//!
//! # Example
//!
//! ```
//! use tabhop::models::TabSnapshot;
//! use tabhop::ordering::order_tabs;
//! use tabhop::query::evaluate;
//!
//! let tabs = vec![
//!     TabSnapshot::new(1, 1).with_title("GitHub").with_url("https://github.com"),
//!     TabSnapshot::new(2, 1).with_title("Docs").with_url("https://docs.rs"),
//! ];
//! // Tab 1 is current, so the switcher offers tab 2 first
//! let ordered = order_tabs(&[1, 2], tabs);
//! assert_eq!(ordered[0].id, 2);
//!
//! let results = evaluate(&ordered, "hostname:github");
//! assert_eq!(results.len(), 1);
//! ```

pub mod background;
pub mod channel;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod directory;
pub mod host;
pub mod logging;
pub mod models;
pub mod ordering;
pub mod query;
pub mod recency;
pub mod session;

// Re-export commonly used types
pub use background::SwitcherHost;
pub use channel::{CorrelationChannel, Port};
pub use config::Config;
pub use cursor::SelectionCursor;
pub use host::{MemoryTabHost, TabHost};
pub use models::{RankedResult, TabId, TabSnapshot};
pub use query::{QueryEngine, evaluate};
pub use recency::RecencyLog;
pub use session::{SwitcherClient, SwitcherSession};
