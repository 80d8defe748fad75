//! prepdesk-core — Interview session state machine and scoring.
//!
//! This crate owns the data model, session progression, answer evaluation,
//! delivery telemetry accumulation, and final report aggregation that the
//! rest of the prepdesk system builds on. Transport (HTTP/WebSocket framing)
//! and the question bank are external collaborators consumed through the
//! seams in [`session`].

pub mod evaluate;
pub mod model;
pub mod report;
pub mod session;
pub mod telemetry;
