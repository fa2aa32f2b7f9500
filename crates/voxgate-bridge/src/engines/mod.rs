//! Reference recognizer engines
//!
//! These ship with the crate rather than living behind `cfg(test)`: the
//! scripted engine drives integration tests and the demo binary alike.

pub mod mock;
pub mod noop;

pub use mock::{ScriptedConfig, ScriptedEngine};
pub use noop::NoOpEngine;
