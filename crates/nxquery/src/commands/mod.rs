//! Command handlers.

pub mod health;
pub mod list;
pub mod query;

use nxquery_core::Datasource;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let datasource = Datasource::new(config::instance_settings(global)?);
    match cmd {
        Command::Query(args) => query::handle(&datasource, &args, global).await,
        Command::Health => health::handle(&datasource, global).await,
        Command::List(args) => list::handle(&datasource, &args, global).await,
    }
}
