use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest, H256},
    utils::hex,
};
use tokio::time::sleep;

use crate::config::Config;

pub type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Build the signing client for the configured network. Touches the
/// network once, to learn the chain id the wallet signs with.
pub async fn connect(config: &Config) -> Result<Arc<Client>> {
    let endpoint = config.rpc_endpoint()?;
    let sk = config.deployer_key()?;
    let raw = hex::decode(sk.strip_prefix("0x").unwrap_or(sk))
        .context("DEPLOYER_PRIVATE_KEY is not valid hex")?;
    let wallet =
        LocalWallet::from_bytes(&raw).context("DEPLOYER_PRIVATE_KEY is not a valid private key")?;
    let provider = Provider::<Http>::try_from(endpoint)
        .with_context(|| format!("invalid rpc endpoint `{endpoint}`"))?;
    let chain_id = provider
        .get_chainid()
        .await
        .with_context(|| format!("failed to reach rpc endpoint `{endpoint}`"))?;

    Ok(Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id.as_u64()),
    )))
}

/// Fill in everything the node would fill before sending, without sending.
pub async fn populate_transaction(
    client: Arc<Client>,
    tx: TransactionRequest,
) -> Result<TypedTransaction> {
    let mut tx = TypedTransaction::Legacy(tx);
    client
        .fill_transaction(&mut tx, None)
        .await
        .context("node rejected the transaction preview")?;
    Ok(tx)
}

pub async fn send_transaction(client: Arc<Client>, tx: TransactionRequest) -> Result<H256> {
    let mut tx = TypedTransaction::Legacy(tx);
    client.fill_transaction(&mut tx, None).await?;

    let transaction_hash = client.send_transaction(tx, None).await?.tx_hash();
    log::info!("transaction hash:{:?}", transaction_hash);
    Ok(transaction_hash)
}

pub async fn wait_transaction(client: Arc<Client>, transaction_hash: H256) -> Result<()> {
    loop {
        sleep(Duration::from_secs(1)).await;
        let transaction = client.get_transaction(transaction_hash).await?;
        if transaction.is_some() {
            return Ok(());
        }
    }
}
