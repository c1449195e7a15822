use anyhow::Result;
use clap::Parser;
use splitpay::application::AppError;
use splitpay::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "splitpay=debug" } else { "splitpay=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.run().await {
        // Rejections leave the ledger untouched
        if let Some(app_err) = err.downcast_ref::<AppError>() {
            if app_err.is_rejection() {
                eprintln!("Rejected: {app_err}");
                std::process::exit(2);
            }
        }
        return Err(err);
    }
    Ok(())
}
