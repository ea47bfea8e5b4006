use clap::Parser;
use tracing::{debug, info};

use soundgrab::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    info!("Starting soundgrab v{}", env!("CARGO_PKG_VERSION"));

    // An interrupt ends the run quietly with status 0.
    tokio::select! {
        result = cli.run() => result,
        _ = tokio::signal::ctrl_c() => {
            debug!("Interrupted");
            Ok(())
        }
    }
}
