//! CLI module for ragchat.
//!
//! ```ignore
//! use ragchat::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, ClientConfig::from_env()).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::config::ClientConfig;

/// Run a parsed command.
pub async fn run_cli_command(command: CliCommand, config: ClientConfig) -> Result<()> {
    match command {
        CliCommand::Ask {
            conversation_id,
            query,
        } => commands::ask(config, &conversation_id, &query).await,
        CliCommand::Chats { search } => commands::chats(config, search.as_deref()).await,
        CliCommand::Login { email } => commands::login(config, &email).await,
        CliCommand::Logout => commands::logout(config).await,
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(reason) => Err(eyre!("{}\n\n{}", reason, USAGE)),
    }
}
