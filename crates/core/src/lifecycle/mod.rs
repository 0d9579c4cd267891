//! Lifecycle state machine - per-class status types and their legal transitions.

mod lifecycle_model;

pub use lifecycle_model::*;

#[cfg(test)]
mod lifecycle_tests;
