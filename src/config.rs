//! Run configuration resolved once at startup.
//!
//! Command-line arguments (with their environment fallbacks) are resolved
//! into one immutable `RunConfig` handed to the driver; nothing reads the
//! environment after this point.

use std::time::Duration;

use url::Url;

use crate::cli::{ProbeArgs, RunArgs};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: Url,
    pub users: usize,
    /// Users spawned per second during ramp-up
    pub ramp_rate: f64,
    pub duration: Duration,
    /// Live reporting interval in seconds; 0 disables the live reporter
    pub report_interval: u64,
    pub request_timeout: Duration,
    pub verbose: bool,
}

fn parse_host(host: &str) -> Result<Url, ConfigError> {
    Url::parse(host).map_err(|source| ConfigError::InvalidHost {
        host: host.to_string(),
        source,
    })
}

impl RunConfig {
    pub fn from_run_args(args: &RunArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_host(&args.host)?,
            users: args.users,
            ramp_rate: args.ramp_rate,
            duration: Duration::from_secs(args.duration),
            report_interval: args.report_interval,
            request_timeout: Duration::from_secs(args.request_timeout),
            verbose: args.verbose,
        })
    }

    pub fn from_probe_args(args: &ProbeArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_host(&args.host)?,
            users: 1,
            ramp_rate: 1.0,
            duration: Duration::ZERO,
            report_interval: 0,
            request_timeout: Duration::from_secs(args.request_timeout),
            verbose: args.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_host_is_a_config_error() {
        let err = parse_host("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }

    #[test]
    fn run_args_resolve_with_defaults() {
        let args = RunArgs {
            host: "http://localhost:5001".to_string(),
            users: 10,
            ramp_rate: 2.0,
            duration: 60,
            report_interval: 5,
            request_timeout: 90,
            verbose: true,
        };
        let config = RunConfig::from_run_args(&args).unwrap();
        assert_eq!(config.host.as_str(), "http://localhost:5001/");
        assert_eq!(config.request_timeout, Duration::from_secs(90));
    }
}
