use std::process;

use clap::Parser;
use ethers::{
    types::U256,
    utils::{parse_units, ParseUnits},
};
use serde_json::Value;

use crate::config::RunMode;

/// Contract targeted when `--contract` is not given.
pub const DEFAULT_CONTRACT: &str = "MonteCarloFunctionsConsumer";

/// Deploy a contract from this project to the configured network.
#[derive(Debug, Parser)]
pub struct DeployCommand {
    /// Name of the contract to deploy
    #[clap(short, long, default_value = DEFAULT_CONTRACT)]
    contract: String,

    /// Prepare the run but skip the deployment itself
    #[clap(short, long)]
    dry: bool,

    /// Compile the contracts first (implied in standalone mode)
    #[clap(long)]
    compile: bool,
}

/// Invoke a function on an already deployed contract.
#[derive(Debug, Parser)]
pub struct CallCommand {
    /// Address of the deployed contract
    #[clap(short, long)]
    address: Option<String>,

    /// Name of the contract
    #[clap(short, long, default_value = DEFAULT_CONTRACT)]
    contract: String,

    /// Name of the function to invoke
    #[clap(short, long)]
    function: Option<String>,

    /// Positional call arguments as a JSON array
    #[clap(long)]
    args: Option<String>,

    /// Ether amount to attach to the call
    #[clap(long, default_value = "0")]
    ether: String,

    /// Build the transaction but do not send it
    #[clap(short, long)]
    dry: bool,

    /// Compile the contracts first (implied in standalone mode)
    #[clap(long)]
    compile: bool,
}

#[derive(Debug)]
pub struct DeploymentRequest {
    pub contract_name: String,
    pub dry_run: bool,
    pub compile: bool,
}

#[derive(Debug)]
pub struct InvocationRequest {
    pub contract_name: String,
    pub contract_address: String,
    pub function_name: String,
    pub args: CallArgs,
    pub ether_value: U256,
    pub dry_run: bool,
    pub compile: bool,
}

/// Ordered call arguments decoded from `--args`, otherwise untyped. An
/// omitted `--args` and an empty array are the same thing; whether the
/// values fit the function signature is decided at encoding time.
#[derive(Debug, Default)]
pub struct CallArgs(Vec<Value>);

impl CallArgs {
    fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            None => Ok(Self::default()),
            Some(raw) => serde_json::from_str::<Vec<Value>>(raw)
                .map(Self)
                .map_err(|_| "`--args` must be a JSON array".to_string()),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl DeployCommand {
    /// Validate into a request, or report the problem and leave. All
    /// validation happens here, before any compilation or network work.
    pub fn into_request(self, mode: RunMode) -> DeploymentRequest {
        self.validate(mode).unwrap_or_else(reject)
    }

    fn validate(self, mode: RunMode) -> Result<DeploymentRequest, String> {
        Ok(DeploymentRequest {
            contract_name: required("--contract", Some(self.contract))?,
            dry_run: self.dry,
            compile: self.compile || mode.is_standalone(),
        })
    }
}

impl CallCommand {
    pub fn into_request(self, mode: RunMode) -> InvocationRequest {
        self.validate(mode).unwrap_or_else(reject)
    }

    fn validate(self, mode: RunMode) -> Result<InvocationRequest, String> {
        let contract_name = required("--contract", Some(self.contract))?;
        let contract_address = required("--address", self.address)?;
        let function_name = required("--function", self.function)?;
        let args = CallArgs::parse(self.args.as_deref())?;
        // parse_units keeps negative amounts in a signed variant; only a
        // plain unsigned amount is acceptable here.
        let ether_value = match parse_units(&self.ether, "ether") {
            Ok(ParseUnits::U256(value)) => value,
            _ => {
                return Err(format!(
                    "`--ether` is not a valid ether amount: `{}`",
                    self.ether
                ))
            }
        };

        Ok(InvocationRequest {
            contract_name,
            contract_address,
            function_name,
            args,
            ether_value,
            dry_run: self.dry,
            compile: self.compile || mode.is_standalone(),
        })
    }
}

fn required(option: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(format!("`{option}` must be provided")),
    }
}

fn reject<T>(message: String) -> T {
    eprintln!("{message}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deploy_command(contract: &str) -> DeployCommand {
        DeployCommand {
            contract: contract.to_string(),
            dry: false,
            compile: false,
        }
    }

    fn call_command(
        address: Option<&str>,
        function: Option<&str>,
        args: Option<&str>,
        ether: &str,
    ) -> CallCommand {
        CallCommand {
            address: address.map(str::to_string),
            contract: DEFAULT_CONTRACT.to_string(),
            function: function.map(str::to_string),
            args: args.map(str::to_string),
            ether: ether.to_string(),
            dry: false,
            compile: false,
        }
    }

    #[test]
    fn blank_contract_names_the_option() {
        let err = deploy_command("   ").validate(RunMode::Hosted).unwrap_err();
        assert!(err.contains("--contract"));
    }

    #[test]
    fn contract_name_is_trimmed() {
        let request = deploy_command("  Counter ")
            .validate(RunMode::Hosted)
            .unwrap();
        assert_eq!(request.contract_name, "Counter");
    }

    #[test]
    fn standalone_mode_compiles_by_default() {
        let standalone = deploy_command(DEFAULT_CONTRACT)
            .validate(RunMode::Standalone)
            .unwrap();
        assert!(standalone.compile);

        let hosted = deploy_command(DEFAULT_CONTRACT)
            .validate(RunMode::Hosted)
            .unwrap();
        assert!(!hosted.compile);
    }

    #[test]
    fn missing_address_names_the_option() {
        let err = call_command(None, Some("bar"), None, "0")
            .validate(RunMode::Hosted)
            .unwrap_err();
        assert!(err.contains("--address"));
    }

    #[test]
    fn missing_function_names_the_option() {
        let err = call_command(Some("0x1"), None, None, "0")
            .validate(RunMode::Hosted)
            .unwrap_err();
        assert!(err.contains("--function"));
    }

    #[test]
    fn omitted_args_equal_empty_array() {
        let omitted = call_command(Some("0x1"), Some("bar"), None, "0")
            .validate(RunMode::Hosted)
            .unwrap();
        let empty = call_command(Some("0x1"), Some("bar"), Some("[]"), "0")
            .validate(RunMode::Hosted)
            .unwrap();
        assert!(omitted.args.values().is_empty());
        assert!(empty.args.values().is_empty());
    }

    #[test]
    fn malformed_args_name_the_option() {
        for raw in ["[1,", "{\"a\": 1}", "not json"] {
            let err = call_command(Some("0x1"), Some("bar"), Some(raw), "0")
                .validate(RunMode::Hosted)
                .unwrap_err();
            assert!(err.contains("--args"), "{raw} should be rejected");
        }
    }

    #[test]
    fn ether_amounts_are_parsed_as_wei() {
        let request = call_command(Some("0x1"), Some("bar"), None, "0.5")
            .validate(RunMode::Hosted)
            .unwrap();
        assert_eq!(request.ether_value, U256::from(500_000_000_000_000_000u64));
    }

    #[test]
    fn bad_ether_names_the_option() {
        for raw in ["five", "1.2.3", "-1"] {
            let err = call_command(Some("0x1"), Some("bar"), None, raw)
                .validate(RunMode::Hosted)
                .unwrap_err();
            assert!(err.contains("--ether"), "{raw} should be rejected");
        }
    }
}
