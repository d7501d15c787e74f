//! Enemy AI for the castle siege.
//!
//! Implements the per-kind stat blocks and the advance / attack / idle
//! state machine that drives every besieger.

pub mod fsm;
pub mod profiles;

pub use castle_core as core;
