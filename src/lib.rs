//! Core library for the `vitalscope` CLI.
//!
//! This crate derives Core Web Vitals (LCP, CLS, INP, FCP, TTFB, FID) from
//! browser performance entries, rates them against the published thresholds,
//! and collects the diagnostics that explain them. Entries arrive through an
//! [`observe::ObservationSource`]; the bundled [`trace::TraceSource`] replays
//! recorded sessions. The primary user-facing interface is the `vitalscope`
//! command-line application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod config;
pub mod error;
pub mod observe;
pub mod shutdown;
pub mod sinks;
pub mod trace;
pub mod vitals;
