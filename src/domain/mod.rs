//! Core domain types and logic.

pub mod error;
pub mod observation;
pub mod instrument;
pub mod tier;
pub mod delta;
pub mod classifier;
pub mod pair;
pub mod universe;
pub mod batch;
pub mod calibration;
