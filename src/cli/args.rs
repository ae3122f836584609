use clap::{ArgAction, Args, Parser, Subcommand};

/// Stock API Load Testing Tool
#[derive(Parser, Debug)]
#[command(name = "stock-load")]
#[command(about = "Load testing tool for the stock trading HTTP API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Run weighted mixed traffic against the target API
    Run(RunArgs),

    /// Execute every operation of every user type once and report outcomes
    Probe(ProbeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Target host URL
    #[arg(
        long,
        default_value = "http://localhost:5001",
        env = "STOCK_API_HOST"
    )]
    pub host: String,

    /// Total simulated user count
    #[arg(short, long, default_value = "10")]
    pub users: usize,

    /// Ramp-up rate in users per second
    #[arg(short, long, default_value = "2.0")]
    pub ramp_rate: f64,

    /// Run duration in seconds
    #[arg(long, default_value = "60")]
    pub duration: u64,

    /// Metrics reporting interval in seconds (0 disables the live view)
    #[arg(long, default_value = "5")]
    pub report_interval: u64,

    /// Request timeout in seconds
    #[arg(long, default_value = "90")]
    pub request_timeout: u64,

    /// Enable verbose logging (true/false)
    #[arg(long, env = "ENABLE_LOGGING", default_value = "true", action = ArgAction::Set)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Target host URL
    #[arg(
        long,
        default_value = "http://localhost:5001",
        env = "STOCK_API_HOST"
    )]
    pub host: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "90")]
    pub request_timeout: u64,

    /// Enable verbose logging (true/false)
    #[arg(long, env = "ENABLE_LOGGING", default_value = "true", action = ArgAction::Set)]
    pub verbose: bool,
}
