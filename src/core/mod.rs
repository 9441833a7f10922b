//! Core carousel logic: measurement, repetition, wrap-around, autoscroll,
//! active-card resolution and the entrance sequence.
//!
//! Nothing in this module depends on any TUI or rendering crate.  All
//! offset mutation happens on the caller's thread through `&mut` borrows.

pub mod active;
pub mod autoscroll;
pub mod card;
pub mod carousel;
pub mod entrance;
pub mod loop_engine;
pub mod measure;
pub mod observer;
pub mod repeat;
pub mod surface;
