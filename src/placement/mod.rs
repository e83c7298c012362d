//! Placement orchestration.
//!
//! # Module Structure
//!
//! - `state`: per-run mutable state (`RunState`) and the `Phase` machine
//! - `pipeline`: the run itself, from target preparation to reassembly
//!
//! Zones are processed by ascending priority, not by position, so the most
//! valuable band is filled first when the link budget is smaller than the
//! sum of the zone ceilings. Inside a zone, blocks are visited in document
//! order and a running word count enforces the minimum spacing between
//! consecutive links.

pub mod pipeline;
pub mod state;

pub use state::{Phase, RunState};
