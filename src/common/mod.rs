//! Common utilities shared by the solver, sampler and tracker.
//!
//! This module contains error types, linear algebra helpers, the
//! deterministic random source and numerical constants.

pub mod constants;
pub mod errors;
pub mod linalg;
pub mod rng;
