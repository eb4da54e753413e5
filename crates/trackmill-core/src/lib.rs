//! TrackMill core
//!
//! Aggregation engine for issue-tracker data: changelog roll-up across
//! subtask hierarchies and the per-issue activity report.

pub mod activity;
pub mod changelog;
pub mod error;
pub mod hierarchy;
pub mod history;
pub mod models;
pub mod quota;
pub mod report;
pub mod repository;
pub mod timeline;

pub use error::{Error, Result};
pub use repository::IssueRepository;

#[cfg(test)]
pub(crate) mod testutil;
