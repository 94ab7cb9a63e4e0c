use mfdl_core::logging;
use std::process::ExitCode;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging as early as possible; stderr fallback keeps the CLI usable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    let status = cli::run_from_args().await;
    ExitCode::from(status.code())
}
