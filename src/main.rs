use remark_client::cli::{parse_args, run_cli_command, CliCommand, VERSION};
use remark_client::{ClientConfig, RemarkClient};

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version before any initialization
    if command == CliCommand::Version {
        println!("remark-client {}", VERSION);
        return Ok(());
    }

    color_eyre::install()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("remark_client=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::debug!("Using {} (site '{}')", config.base_url, config.site_id);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let client = RemarkClient::builder(config).build();
        run_cli_command(command, &client).await
    })
}
