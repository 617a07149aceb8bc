//! FTM CLI - Command line tool for snow coverage study areas.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ftm-cli",
    version,
    about = "Snow coverage study area toolkit"
)]
struct Cli {
    #[command(flatten)]
    api: ftm_cmd::ApiArgs,

    #[command(subcommand)]
    command: ftm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Using backend at {}", cli.api.api_url);
    ftm_cmd::run(cli.command, &cli.api).await
}
