//! CLI module for remark-client.
//!
//! A small driver around the library, useful for poking at a live comment
//! server:
//!
//! ```ignore
//! use remark_client::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! runtime.block_on(run_cli_command(command, &client))?;
//! ```

pub mod args;

pub use args::{parse_args, CliCommand, USAGE};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::io::{self, BufRead, Write};

use crate::auth::{FormProvider, OAuthProvider, Revalidation, SignInFlow, SubmitOutcome};
use crate::client::RemarkClient;
use crate::models::User;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute `command` against `client`.
pub async fn run_cli_command(command: CliCommand, client: &RemarkClient) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("remark-client {}", VERSION);
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(message) => Err(eyre!("{}\n\n{}", message, USAGE)),
        CliCommand::Config => {
            let config = client.comments().config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        CliCommand::WhoAmI => {
            match client.auth().current_user().await {
                Some(user) => print_user(&user),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        CliCommand::Logout => {
            client.logout().await?;
            println!("Signed out");
            Ok(())
        }
        CliCommand::LoginAnonymous { name } => {
            let mut flow = form_flow(client, FormProvider::Anonymous).await?;
            flow.set_username(name);
            finish(client, &mut flow).await
        }
        CliCommand::LoginEmail { email, name } => {
            let mut flow = form_flow(client, FormProvider::Email).await?;
            flow.set_username(name);
            flow.set_email(email);
            match flow.submit().await {
                SubmitOutcome::AwaitingCode => {}
                outcome => return Err(outcome_error(&flow, outcome)),
            }
            if let Some(message) = flow.top_error() {
                eprintln!("Warning: {}", message);
            }

            print!("Enter the code sent to your email: ");
            io::stdout().flush().ok();
            let mut code = String::new();
            io::stdin()
                .lock()
                .read_line(&mut code)
                .wrap_err("Failed to read the verification code")?;
            flow.set_code(code.trim());
            finish(client, &mut flow).await
        }
        CliCommand::LoginOAuth { provider } => {
            let provider = OAuthProvider::parse(&provider)
                .ok_or_else(|| eyre!("Unknown OAuth provider '{}'", provider))?;
            let config = client.comments().config().await?;
            let mut flow = client.sign_in_flow(&config);
            if !flow.providers().oauth.contains(&provider) {
                return Err(eyre!("Provider '{}' is not enabled on this site", provider));
            }

            let url = flow.submit_oauth(&provider)?;
            println!("Complete sign-in in your browser: {}", url);
            print!("Press Enter when done... ");
            io::stdout().flush().ok();
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).ok();

            match client.scheduler().handle_visibility_change() {
                Revalidation::Started(handle) => match handle.await? {
                    Some(user) => print_user(&user),
                    None => println!("No session was established for this client"),
                },
                other => println!("Session check skipped: {:?}", other),
            }
            Ok(())
        }
    }
}

async fn form_flow(client: &RemarkClient, provider: FormProvider) -> Result<SignInFlow> {
    let config = client
        .comments()
        .config()
        .await
        .wrap_err("Failed to load server configuration")?;
    let mut flow = client.sign_in_flow(&config);
    if !flow.select_provider(provider) {
        return Err(eyre!("Provider '{}' is not enabled on this site", provider));
    }
    Ok(flow)
}

async fn finish(client: &RemarkClient, flow: &mut SignInFlow) -> Result<()> {
    match flow.submit().await {
        SubmitOutcome::SignedIn(user) => {
            print_user(&user);
            if client.session().tokens().is_held() {
                println!("Session token received");
            }
            Ok(())
        }
        outcome => Err(outcome_error(flow, outcome)),
    }
}

fn outcome_error(flow: &SignInFlow, outcome: SubmitOutcome) -> color_eyre::Report {
    use crate::auth::Field;

    if outcome == SubmitOutcome::Rejected {
        let reasons: Vec<String> = [Field::Username, Field::Email, Field::Code]
            .into_iter()
            .filter_map(|field| flow.field_error(field))
            .map(|reason| reason.to_string())
            .collect();
        return eyre!("{}", reasons.join("; "));
    }

    match flow.last_error() {
        Some(err) => eyre!("{} ({})", flow.top_error().unwrap_or_default(), err),
        None => eyre!("Sign-in did not complete: {:?}", outcome),
    }
}

fn print_user(user: &User) {
    println!("Signed in as {} ({})", user.name, user.id);
    if user.admin {
        println!("  admin");
    }
    if user.verified {
        println!("  verified");
    }
}
