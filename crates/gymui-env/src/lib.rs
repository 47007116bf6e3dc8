//! # Environments
//!
//! Wraps a [`gymui_core::Controller`] in the usual reinforcement-learning
//! surface: `reset(seed)` returns the state vector, `step(x, y)` clicks and
//! returns the new state, the number of newly set reward bits, a done flag
//! and a [`StepInfo`].
//!
//! Apps are looked up by name in a [`Registry`] rather than a global table,
//! so a process can host any number of independent environments.

pub mod config;
pub mod env;
pub mod error;
pub mod registry;
pub mod tests;

pub use config::*;
pub use env::*;
pub use error::*;
pub use registry::*;
