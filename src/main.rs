use anyhow::Context;
use clap::Parser;

use contacts_rs::cli::{Cli, CommandOutcome, execute_command, load_and_merge_config};
use contacts_rs::logger::init_logger;
use contacts_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli).context("Failed to load configuration")?;
    init_logger(&settings.logger).context("Failed to initialize logger")?;

    match execute_command(&cli, settings).await? {
        CommandOutcome::StartServer(settings) => Server::new(settings).run().await,
        CommandOutcome::Done => Ok(()),
    }
}
