use packsync_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging() {
        match logging::init_logging_stderr() {
            Ok(()) => tracing::warn!("file logging unavailable: {:#}", err),
            Err(fallback) => eprintln!("packsync: logging disabled: {:#}; {:#}", err, fallback),
        }
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("packsync error: {:#}", err);
        std::process::exit(1);
    }
}
