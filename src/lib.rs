//! Kinoko Sensei - a philosopher who turns out to be an IT instructor
//!
//! This crate implements a guided conversation that starts as Socratic
//! dialogue, reveals a technical-instructor persona, and closes with a
//! structured analysis report.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
