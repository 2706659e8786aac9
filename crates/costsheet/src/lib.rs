//! Cost-sheet engine for real-estate unit pricing.
//!
//! The [`workflows::costing`] module holds the pure pricing rules: plan
//! selection, cost breakdown, and payment schedule. The remaining modules are
//! the adapters around it: the spreadsheet-backed catalog, the page handoff
//! store, and tabular document export.

pub mod config;
pub mod error;
pub mod progress;
pub mod telemetry;
pub mod workflows;
