//! Subcommands.

mod config;
mod extract;
mod filterbank;
mod util;

pub use config::ConfigCommand;
pub use extract::ExtractCommand;
pub use filterbank::FilterbankCommand;
pub use util::ConfigArgs;
