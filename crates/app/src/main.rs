use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ptac::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut stdout = std::io::stdout();
    tokio::select! {
        outcome = ptac::run(&args, &mut stdout) => match outcome {
            Ok(status) => status.exit_code(),
            Err(e) => {
                error!("An error occurred: {e:#}");
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            info!("Processing interrupted by user");
            // In-flight OCR calls run on blocking threads the runtime would wait for.
            std::process::exit(1);
        }
    }
}
