use color_eyre::Result;

use ragchat::cli::{parse_args, run_cli_command};
use ragchat::config::ClientConfig;
use ragchat::logging;

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let command = parse_args(std::env::args());
    let config = ClientConfig::from_env();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_cli_command(command, config))
}
