//! Command-line argument parsing for the ragchat CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Stream an answer to stdout
    Ask {
        conversation_id: String,
        query: String,
    },
    /// List conversations grouped by age, optionally filtered by title
    Chats { search: Option<String> },
    /// Sign in and store the access token
    Login { email: String },
    /// Remove the stored access token
    Logout,
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Arguments that could not be parsed
    Invalid(String),
}

/// Usage text printed by `help` and after invalid arguments
pub const USAGE: &str = "\
Usage:
  ragchat ask <conversation-id> <query...>
  ragchat chats [search]
  ragchat login <email>
  ragchat logout
  ragchat --version";

/// Parse command-line arguments and return the command to run.
///
/// # Examples
///
/// ```
/// use ragchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ragchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();
    let Some(first) = args.first() else {
        return CliCommand::Help;
    };

    match first.as_str() {
        "--version" | "-V" => CliCommand::Version,
        "help" | "--help" | "-h" => CliCommand::Help,
        "ask" => {
            let Some(conversation_id) = args.get(1) else {
                return CliCommand::Invalid("ask needs a conversation id".to_string());
            };
            let query = args[2..].join(" ");
            if query.trim().is_empty() {
                return CliCommand::Invalid("ask needs a query".to_string());
            }
            CliCommand::Ask {
                conversation_id: conversation_id.clone(),
                query,
            }
        }
        "chats" => {
            let search = args[1..].join(" ");
            CliCommand::Chats {
                search: (!search.trim().is_empty()).then_some(search),
            }
        }
        "login" => match args.get(1) {
            Some(email) => CliCommand::Login {
                email: email.clone(),
            },
            None => CliCommand::Invalid("login needs an email".to_string()),
        },
        "logout" => CliCommand::Logout,
        other => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut all = vec!["ragchat".to_string()];
        all.extend(args.iter().map(|a| a.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args_is_help() {
        assert_eq!(parse(&[]), CliCommand::Help);
    }

    #[test]
    fn test_parse_ask_joins_query() {
        assert_eq!(
            parse(&["ask", "42", "what", "is", "it?"]),
            CliCommand::Ask {
                conversation_id: "42".to_string(),
                query: "what is it?".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_ask_missing_parts() {
        assert!(matches!(parse(&["ask"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["ask", "42"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_chats() {
        assert_eq!(parse(&["chats"]), CliCommand::Chats { search: None });
        assert_eq!(
            parse(&["chats", "rust"]),
            CliCommand::Chats {
                search: Some("rust".to_string())
            }
        );
    }

    #[test]
    fn test_parse_login_logout() {
        assert_eq!(
            parse(&["login", "a@b.c"]),
            CliCommand::Login {
                email: "a@b.c".to_string()
            }
        );
        assert!(matches!(parse(&["login"]), CliCommand::Invalid(_)));
        assert_eq!(parse(&["logout"]), CliCommand::Logout);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(parse(&["--unknown"]), CliCommand::Invalid(_)));
    }
}
