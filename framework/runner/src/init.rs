use crate::cli::DemoCli;
use clap::Parser;

/// Initialise the CLI and logging for the demo runner.
pub fn init() -> DemoCli {
    env_logger::init();

    DemoCli::parse()
}
