//! Collection pipeline.
//!
//! - `RateLimiter`: one request budget shared by every outbound call
//! - `CategoryWalker`: pages through one category and records results
//! - `Collector`: walks all categories in order
//! - `tally` / `verify`: read-only reports over collected files

mod collect;
mod rate_limit;
mod tally;
mod verify;
mod walk;

pub use collect::{Collector, RunStats};
pub use rate_limit::RateLimiter;
pub use tally::{CategoryTally, tally};
pub use verify::{FileStatus, check_bytes, verify};
pub use walk::{CategoryWalker, WalkStats};
