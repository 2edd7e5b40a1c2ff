//! Deployment and invocation harness for the MonteCarloFunctionsConsumer
//! contract project.

pub mod call;
pub mod command_line;
pub mod config;
pub mod contracts;
pub mod deploy;
pub mod utils;
