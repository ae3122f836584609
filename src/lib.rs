//! Weighted load-generation driver for the stock trading HTTP API.
//!
//! Simulates concurrent user traffic: each simulated user repeatedly picks
//! an operation by weight, builds a request from a typed parameter pool,
//! sends it, and classifies the response against the operation's accept set.

pub mod classify;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod params;
pub mod users;
