//! Command-line argument parsing for the remark-client CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Print usage
    Help,
    /// Print the server configuration
    Config,
    /// Print the current identity
    WhoAmI,
    /// Sign in anonymously under `name`
    LoginAnonymous { name: String },
    /// Sign in by email; the code is read from stdin
    LoginEmail { email: String, name: String },
    /// Open the OAuth page of `provider` in the system browser
    LoginOAuth { provider: String },
    /// End the server session
    Logout,
    /// Arguments could not be parsed
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: remark-client <command>

Commands:
  config                        Show the server configuration
  whoami                        Show the current user
  login-anonymous <name>        Sign in anonymously
  login-email <email> <name>    Sign in by email (code is read from stdin)
  login-oauth <provider>        Sign in through an OAuth provider
  logout                        Sign out
  --version, -V                 Show version

Environment:
  REMARK_URL, REMARK_SITE_ID, REMARK_PAGE_URL, RUST_LOG";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use remark_client::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["remark-client".to_string(), "whoami".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::WhoAmI);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);
    let Some(command) = args.next() else {
        return CliCommand::Help;
    };

    let mut required = |what: &str| {
        args.next()
            .ok_or_else(|| CliCommand::Invalid(format!("{} requires <{}>", command, what)))
    };

    let parsed = match command.as_str() {
        "--version" | "-V" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "config" => Ok(CliCommand::Config),
        "whoami" => Ok(CliCommand::WhoAmI),
        "logout" => Ok(CliCommand::Logout),
        "login-anonymous" => required("name").map(|name| CliCommand::LoginAnonymous { name }),
        "login-email" => required("email").and_then(|email| {
            required("name").map(|name| CliCommand::LoginEmail { email, name })
        }),
        "login-oauth" => {
            required("provider").map(|provider| CliCommand::LoginOAuth { provider })
        }
        other => Err(CliCommand::Invalid(format!("unknown command '{}'", other))),
    };

    parsed.unwrap_or_else(|invalid| invalid)
}
