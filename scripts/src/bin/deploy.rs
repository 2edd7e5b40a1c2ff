use anyhow::Result;
use clap::Parser;
use monte_carlo_scripts::{
    command_line::DeployCommand,
    config::{Config, RunMode},
    deploy,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mode = RunMode::detect();
    if mode.is_standalone() {
        println!("Running in standalone mode");
    }

    let request = DeployCommand::parse().into_request(mode);
    let config = Config::from_env()?;
    deploy::run(request, config).await
}
