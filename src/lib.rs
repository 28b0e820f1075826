//! Perfverdict workspace-level test utilities.
//!
//! This crate exists solely to support workspace-level integration tests,
//! particularly the BDD/cucumber tests in `tests/cucumber.rs` and the
//! library pipeline tests in `tests/integration/`.
//!
//! The actual perfverdict functionality is in the workspace member crates:
//! - `perfverdict-types`: Shared types and JSON schemas
//! - `perfverdict-stats` / `perfverdict-significance`: Descriptive statistics and t-tests
//! - `perfverdict-domain`: Classification, roll-up and aggregation
//! - `perfverdict-config` / `perfverdict-ingest`: Config resolution and table readers
//! - `perfverdict-render`: Table rendering
//! - `perfverdict-app`: Application use cases
//! - `perfverdict-cli`: CLI interface
