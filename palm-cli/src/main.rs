//! Palm CLI - command line tool for palm oil yield data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "palm-cli",
    version,
    about = "Palm oil yield dashboard, prediction and insight toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: palm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    palm_cmd::run(cli.command).await
}
