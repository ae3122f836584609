mod args;

pub use args::{Cli, Mode, ProbeArgs, RunArgs};
