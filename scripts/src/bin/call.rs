use anyhow::Result;
use clap::Parser;
use monte_carlo_scripts::{
    call,
    command_line::CallCommand,
    config::{Config, RunMode},
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mode = RunMode::detect();
    if mode.is_standalone() {
        println!("Running in standalone mode");
    }

    let request = CallCommand::parse().into_request(mode);
    let config = Config::from_env()?;
    call::run(request, config).await
}
