//! Tabular Q-learning on a small deterministic grid world
//!
//! The crate is organized around a handful of small modules:
//!
//! - [`grid`]: the environment (cells, actions, rewards, rendering)
//! - [`q_table`]: the dense state-action value table
//! - [`policy`]: epsilon-greedy selection and the epsilon decay schedule
//! - [`training`] / [`evaluation`]: the episode loops
//! - [`persistence`]: fixed-layout binary save/load for tables
//! - [`observer`]: pluggable instrumentation for the loops
//! - [`cli`]: the `train` and `play` commands

pub mod cli;
pub mod error;
pub mod evaluation;
pub mod grid;
pub mod observer;
pub mod persistence;
pub mod policy;
pub mod q_table;
pub mod training;

pub use error::{Error, Result};
pub use grid::{Action, GridConfig, GridEnvironment, Position};
pub use q_table::QTable;
