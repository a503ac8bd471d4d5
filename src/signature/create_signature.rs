use ethers::{
    providers::Middleware,
    signers::LocalWallet,
    types::{transaction::eip712::EIP712Domain, Address, Bytes, Signature},
};

use crate::{
    eip712::{order_typed_data, Eip712},
    exchange::order::OrderComponents,
    prelude::*,
    Error,
};

/// Signs the order's EIP-712 digest with a key held in process
pub fn sign_order_with_wallet(
    wallet: &LocalWallet,
    domain: &EIP712Domain,
    components: &OrderComponents,
) -> Result<Bytes> {
    let signature = wallet
        .sign_hash(components.eip712_signing_hash(domain))
        .map_err(|e| Error::SignatureFailure(e.to_string()))?;
    Ok(Bytes::from(signature.to_vec()))
}

/// Asks the node to sign with one of its accounts through
/// `eth_signTypedData_v4`
pub async fn request_order_signature<M: Middleware>(
    provider: &M,
    domain: &EIP712Domain,
    components: &OrderComponents,
    account: Address,
) -> Result<Bytes> {
    let typed_data = order_typed_data(domain, components)?;
    let raw: Bytes = provider
        .provider()
        .request("eth_signTypedData_v4", (account, typed_data))
        .await
        .map_err(|e| Error::SignatureFailure(e.to_string()))?;
    let signature = Signature::try_from(raw.as_ref())
        .map_err(|e| Error::SignatureFailure(e.to_string()))?;
    Ok(Bytes::from(signature.to_vec()))
}

pub fn recover_order_signer(
    domain: &EIP712Domain,
    components: &OrderComponents,
    signature: &Bytes,
) -> Result<Address> {
    let signature = Signature::try_from(signature.as_ref())
        .map_err(|e| Error::SignatureFailure(e.to_string()))?;
    signature
        .recover(components.eip712_signing_hash(domain))
        .map_err(|e| Error::SignatureFailure(e.to_string()))
}
