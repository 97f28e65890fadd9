//! `interval-timer` — interval workout countdown engine.
//!
//! This library provides the phase timer engine that drives a structured
//! interval workout (preparation countdown, then work/rest phases nested
//! inside sets), publishing `started`, `tick`, and `ended` signals once per
//! second so independent listeners can render notifications or play cues
//! without being part of the timing logic.

pub mod announce;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod signal;
pub mod timer;
