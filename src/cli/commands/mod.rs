//! CLI command implementations

pub mod play;
pub mod train;

use std::path::Path;

use anyhow::Result;

use crate::{Error, GridEnvironment, QTable, persistence};

/// Load a persisted table and reject one whose dimensions do not match the
/// environment in use
pub(crate) fn load_matching_table(path: &Path, env: &GridEnvironment) -> Result<QTable> {
    let table = persistence::load(path)?;
    if !table.matches(env) {
        return Err(Error::DimensionMismatch {
            table_width: table.width(),
            table_height: table.height(),
            env_width: env.width(),
            env_height: env.height(),
        }
        .into());
    }
    Ok(table)
}
