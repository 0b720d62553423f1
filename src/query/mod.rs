//! Tab search: structured `field:value` filters and fuzzy text matching.
//!
//! [`evaluate`] is the entry point. [`parser`] and [`fields`] define the
//! structured language, [`fuzzy`] wraps nucleo, [`highlight`] turns match spans
//! back into renderable runs.

pub mod evaluate;
pub mod fields;
pub mod fuzzy;
pub mod highlight;
pub mod parser;

pub use evaluate::{QueryEngine, evaluate};
pub use fields::{SearchField, registry};
pub use fuzzy::{CaseMode, FuzzyMatcher, FuzzyOptions};
pub use highlight::{Run, mark, runs};
pub use parser::{StructuredQuery, parse_query};
