use anyhow::Result;
use ethers::contract::ContractFactory;

use crate::{command_line::DeploymentRequest, config::Config, contracts, utils};

/// Deploy the requested contract, or stop just short of it on a dry run.
pub async fn run(request: DeploymentRequest, config: Config) -> Result<()> {
    if request.compile {
        contracts::compile(config.project_root())?;
    }

    if request.dry_run {
        println!("Dry run: `{}` will not be deployed", request.contract_name);
        return Ok(());
    }

    let artifact = contracts::find_artifact(&config.artifacts_dir(), &request.contract_name)?;
    let bytecode = artifact.bytecode()?;
    let client = utils::connect(&config).await?;

    let factory = ContractFactory::new(artifact.abi, bytecode, client);
    let contract = factory.deploy(())?.send().await?;

    println!("Contract deployed to {:?}", contract.address());
    Ok(())
}
