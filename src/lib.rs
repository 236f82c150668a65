//! Snapshot a YouTube playlist on every run and record what changed.
//!
//! Each run fetches the full playlist, diffs it against the stored snapshot
//! and replaces the stored playlist and diff, optionally archiving the
//! previous ones first.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod report;
pub mod run;
pub mod snapshot;
pub mod store;
