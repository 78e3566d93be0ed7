//! Shared contract between the marking backend and the upload frontend.
//!
//! Everything in this crate is free of I/O so it can run on both sides of the
//! wire and be tested natively.

pub mod form;
pub mod jobs;
pub mod markdown;
pub mod model;
pub mod progress;
pub mod report;
