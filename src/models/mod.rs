//! Data models shared by the host process and the switcher session.
//!
//! - [`TabSnapshot`] - a tab as reported by the host on refresh
//! - [`RankedResult`] - one evaluated query result with highlight spans

pub mod ranked;
pub mod tab;

pub use ranked::{FieldMatch, MatchField, RankedResult};
pub use tab::{NO_TAB, TabId, TabSnapshot, WindowId};
