use anyhow::{Context, Result};
use ethers::{
    abi::Function,
    types::{transaction::eip2718::TypedTransaction, Address, TransactionRequest, U256},
};

use crate::{command_line::InvocationRequest, config::Config, contracts, utils};

/// Upper bound on gas for every invocation sent by this tool.
const CALL_GAS_LIMIT: u64 = 1_000_000;

/// Per-call transaction overrides: the fixed gas limit, plus the attached
/// ether when there is any.
#[derive(Debug)]
pub struct CallOverrides {
    gas_limit: U256,
    value: Option<U256>,
}

impl CallOverrides {
    pub fn new(ether_value: U256) -> Self {
        Self {
            gas_limit: U256::from(CALL_GAS_LIMIT),
            value: (!ether_value.is_zero()).then_some(ether_value),
        }
    }

    pub fn apply(&self, tx: TransactionRequest) -> TransactionRequest {
        let tx = tx.gas(self.gas_limit);
        match self.value {
            Some(value) => tx.value(value),
            None => tx,
        }
    }
}

/// Invoke a function on a deployed contract, or populate the transaction
/// without sending it on a dry run.
pub async fn run(request: InvocationRequest, config: Config) -> Result<()> {
    if request.compile {
        contracts::compile(config.project_root())?;
    }

    let artifact = contracts::find_artifact(&config.artifacts_dir(), &request.contract_name)?;
    let function = artifact.function(&request.function_name)?;
    let to: Address = request.contract_address.parse().with_context(|| {
        format!(
            "`--address` is not an address: `{}`",
            request.contract_address
        )
    })?;
    let overrides = CallOverrides::new(request.ether_value);

    println!("Call args: {}", serde_json::to_string(request.args.values())?);

    if request.dry_run {
        println!("Dry run: the transaction will be built but not sent");
        // A failure to build is an outcome of the dry run, not a failure
        // of the tool; the cause is reported and the exit stays clean.
        match populate(&config, function, &request, to, &overrides).await {
            Ok(populated) => println!("{}", serde_json::to_string_pretty(&populated)?),
            Err(err) => eprintln!("dry run failed: {err:#}"),
        }
        return Ok(());
    }

    let calldata = contracts::encode_call(function, request.args.values())?;
    let client = utils::connect(&config).await?;
    let tx = overrides.apply(TransactionRequest::new().to(to).data(calldata));
    let transaction_hash = utils::send_transaction(client.clone(), tx).await?;
    utils::wait_transaction(client, transaction_hash).await?;

    println!("Tx hash {:?}", transaction_hash);
    Ok(())
}

async fn populate(
    config: &Config,
    function: &Function,
    request: &InvocationRequest,
    to: Address,
    overrides: &CallOverrides,
) -> Result<TypedTransaction> {
    let calldata = contracts::encode_call(function, request.args.values())
        .with_context(|| format!("failed to encode `--args` for `{}`", function.name))?;
    let client = utils::connect(config).await?;
    let tx = overrides.apply(TransactionRequest::new().to(to).data(calldata));
    utils::populate_transaction(client, tx).await
}
