//! Search-with-fallback engine
//!
//! Takes a filter query against the normalized inventory and always returns
//! a best-effort ranked result set, progressively relaxing constraints in a
//! fixed importance order when the exact query yields nothing.

pub mod convert;
pub mod engine;
pub mod fallback;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod ranking;

pub use engine::{SearchEngine, SearchRequest, SearchResult, RESULT_LIMIT};
pub use fallback::{FallbackInfo, Relaxation, FALLBACK_PRIORITY};
pub use filters::{ActiveFilters, FilterKey, RangeParams};
pub use matcher::{MatchOutcome, MatchPolicy};
pub use ranking::RankMode;
