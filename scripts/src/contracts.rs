use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use ethers::{
    abi::{Abi, Function, ParamType, Token},
    solc::{Project, ProjectPathsConfig},
    types::{Address, Bytes, I256, U256},
    utils::hex,
};
use serde::Deserialize;
use serde_json::Value;

/// Compiled contract artifact. Hardhat stores the creation bytecode as a
/// bare hex string, solc standard JSON wraps it in an object; both are
/// accepted.
#[derive(Debug, Deserialize)]
pub struct ContractArtifact {
    pub abi: Abi,
    #[serde(default)]
    bytecode: Option<BytecodeField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Plain(Bytes),
    Wrapped { object: Bytes },
}

impl ContractArtifact {
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.abi
            .function(name)
            .map_err(|_| anyhow!("contract abi has no function named `{name}`"))
    }

    pub fn bytecode(&self) -> Result<Bytes> {
        let bytecode = match &self.bytecode {
            Some(BytecodeField::Plain(bytes)) => bytes.clone(),
            Some(BytecodeField::Wrapped { object }) => object.clone(),
            None => Bytes::default(),
        };
        if bytecode.is_empty() {
            bail!("artifact carries no creation bytecode");
        }
        Ok(bytecode)
    }
}

/// Compile the contracts project in place. Artifacts land in the project's
/// `artifacts/` directory where [`find_artifact`] picks them up.
pub fn compile(root: &Path) -> Result<()> {
    let paths = ProjectPathsConfig::hardhat(root)?;
    let project = Project::builder().paths(paths).build()?;
    let output = project.compile()?;
    if output.has_compiler_errors() {
        bail!("compilation failed:\n{output}");
    }
    Ok(())
}

/// Locate `<name>.json` anywhere under the artifacts tree. Hardhat keeps a
/// `<name>.dbg.json` companion next to every artifact; the exact-name match
/// leaves those alone.
pub fn find_artifact(artifacts_dir: &Path, name: &str) -> Result<ContractArtifact> {
    let file_name = format!("{name}.json");
    let path = search(artifacts_dir, &file_name)?.ok_or_else(|| {
        anyhow!(
            "no artifact for `{}` under {} (is the project compiled?)",
            name,
            artifacts_dir.display()
        )
    })?;
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read artifact {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a contract artifact", path.display()))
}

fn search(dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(None),
    };
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if let Some(found) = search(&path, file_name)? {
                return Ok(Some(found));
            }
        } else if path.file_name().and_then(|f| f.to_str()) == Some(file_name) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// ABI-encode a call to `function` from loosely-typed JSON values. The
/// values are only known to be well-formed JSON at this point; whether
/// they fit the function's inputs is decided here.
pub fn encode_call(function: &Function, args: &[Value]) -> Result<Bytes> {
    if args.len() != function.inputs.len() {
        bail!(
            "function `{}` takes {} argument(s), `--args` has {}",
            function.name,
            function.inputs.len(),
            args.len()
        );
    }
    let tokens = function
        .inputs
        .iter()
        .zip(args)
        .map(|(input, value)| {
            coerce(&input.kind, value).with_context(|| {
                format!(
                    "`--args` value {value} does not fit parameter `{}` ({})",
                    input.name, input.kind
                )
            })
        })
        .collect::<Result<Vec<Token>>>()?;
    Ok(function.encode_input(&tokens)?.into())
}

fn coerce(kind: &ParamType, value: &Value) -> Result<Token> {
    let token = match (kind, value) {
        (ParamType::Address, Value::String(s)) => Token::Address(s.parse::<Address>()?),
        (ParamType::Bool, Value::Bool(b)) => Token::Bool(*b),
        (ParamType::String, Value::String(s)) => Token::String(s.clone()),
        (ParamType::Uint(_), value) => Token::Uint(uint_from(value)?),
        (ParamType::Int(_), value) => Token::Int(int_from(value)?),
        (ParamType::Bytes, Value::String(s)) => Token::Bytes(hex_bytes(s)?),
        (ParamType::FixedBytes(len), Value::String(s)) => {
            let bytes = hex_bytes(s)?;
            if bytes.len() != *len {
                bail!("expected {len} bytes, got {}", bytes.len());
            }
            Token::FixedBytes(bytes)
        }
        (ParamType::Array(inner), Value::Array(items)) => Token::Array(
            items
                .iter()
                .map(|item| coerce(inner, item))
                .collect::<Result<_>>()?,
        ),
        (ParamType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                bail!("expected {len} elements, got {}", items.len());
            }
            Token::FixedArray(
                items
                    .iter()
                    .map(|item| coerce(inner, item))
                    .collect::<Result<_>>()?,
            )
        }
        (ParamType::Tuple(kinds), Value::Array(items)) => {
            if items.len() != kinds.len() {
                bail!("expected {} tuple elements, got {}", kinds.len(), items.len());
            }
            Token::Tuple(
                kinds
                    .iter()
                    .zip(items)
                    .map(|(kind, item)| coerce(kind, item))
                    .collect::<Result<_>>()?,
            )
        }
        (kind, value) => bail!("cannot encode {value} as {kind}"),
    };
    Ok(token)
}

fn uint_from(value: &Value) -> Result<U256> {
    match value {
        Value::Number(n) => {
            let n = n
                .as_u64()
                .ok_or_else(|| anyhow!("`{n}` is not an unsigned integer"))?;
            Ok(U256::from(n))
        }
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x") {
                Some(hexed) => Ok(U256::from_str_radix(hexed, 16)?),
                None => Ok(U256::from_dec_str(s)?),
            }
        }
        other => bail!("`{other}` is not an unsigned integer"),
    }
}

fn int_from(value: &Value) -> Result<U256> {
    match value {
        Value::Number(n) => {
            let n = n.as_i64().ok_or_else(|| anyhow!("`{n}` is not an integer"))?;
            Ok(I256::from(n).into_raw())
        }
        Value::String(s) => Ok(I256::from_dec_str(s.trim())?.into_raw()),
        other => bail!("`{other}` is not an integer"),
    }
}

fn hex_bytes(s: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(s.strip_prefix("0x").unwrap_or(s))?)
}
