//! The composed marketplace engine.
//!
//! Wires every component over one shared entity store and exposes the full
//! operation surface to the presentation layer.

pub mod marketplace;

pub use marketplace::Marketplace;
