//! Core business logic - framework-agnostic donor analytics operations.
//!
//! Data flows one direction through this module: a transaction mutation
//! ([`transactions`]) is handed to the trigger coordinator ([`trigger`]),
//! which recomputes giving aggregates ([`aggregation`]) and then the RFM
//! score ([`rfm`]) for the owning contact, plus campaign and pledge rollups
//! ([`rollup`]) off the same transaction set. [`rates`] and [`report`] are
//! read-only consumers of the derived fields.

/// Contact giving-aggregate recalculation
pub mod aggregation;
/// Division-by-zero-guarded rate calculations
pub mod rates;
/// Dashboard report assembly
pub mod report;
/// RFM scoring and donor segmentation
pub mod rfm;
/// Campaign and pledge rollups
pub mod rollup;
/// Transaction mutation service and status lifecycle
pub mod transactions;
/// Recalculation trigger coordination
pub mod trigger;
