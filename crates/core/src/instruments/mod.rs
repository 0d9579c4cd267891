//! Instruments module - cross-class record, detail and summary types.

mod instruments_model;

pub use instruments_model::*;
