use std::process::ExitCode;

use l2switch_cli::Cli;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .init();

    match l2switch_cli::run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "l2switch failed");
            ExitCode::FAILURE
        }
    }
}
