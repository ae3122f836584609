use anyhow::Result;
use clap::Parser;

use stock_load::cli::{Cli, Mode};
use stock_load::config::RunConfig;
use stock_load::driver;
use stock_load::metrics::reporter;

fn init_tracing(verbose: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.mode {
        Mode::Run(args) => {
            init_tracing(args.verbose)?;

            tracing::info!("Stock API Load Test Starting...");
            tracing::info!("Host: {}", args.host);
            tracing::info!("Users: {}", args.users);
            tracing::info!("Ramp Rate: {}/sec", args.ramp_rate);
            tracing::info!("Duration: {}s", args.duration);
            tracing::info!("Request Timeout: {}s", args.request_timeout);

            let config = RunConfig::from_run_args(&args)?;
            let collector = driver::run(config).await?;

            tracing::info!("Load test complete");
            reporter::print_final_report(&collector);
        }

        Mode::Probe(args) => {
            init_tracing(args.verbose)?;

            tracing::info!("Probing every operation once against {}", args.host);

            let config = RunConfig::from_probe_args(&args)?;
            let collector = driver::probe(config).await?;

            reporter::print_final_report(&collector);
        }
    }

    Ok(())
}
