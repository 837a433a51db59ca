//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: visited set, FIFO queue, discovered faculties and visit history
//! - `QueuedPage`: a queue entry carrying its depth, stage and breadcrumb trail
//! - `HistoryEntry`: one logged visit

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, HistoryEntry, QueuedPage, SEED_STEP_NAME};
