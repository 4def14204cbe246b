//! Configuration command.

use clap::Args;

use super::util::{resolve_config, write_output};
use crate::Cli;

/// Print the effective feature configuration.
#[derive(Args)]
pub struct ConfigCommand {}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = resolve_config(cli)?;
        write_output(cli, &cfg)
    }
}
