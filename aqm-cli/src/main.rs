//! AQM CLI - air quality sensor data pipeline tool.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aqm-cli",
    version,
    about = "Air quality monitoring data pipeline"
)]
struct Cli {
    #[command(flatten)]
    select: aqm_cmd::SelectArgs,

    #[command(subcommand)]
    command: aqm_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    aqm_cmd::run(cli.select, cli.command)
}
