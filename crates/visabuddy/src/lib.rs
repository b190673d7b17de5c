//! Core library for the VisaBuddy backend.
//!
//! The crate hosts the document checklist generation pipeline plus the shared
//! configuration, telemetry, and error surface consumed by the HTTP service in
//! `services/api`.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
