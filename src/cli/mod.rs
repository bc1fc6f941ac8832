//! Command-line interface modules

pub mod commands;
