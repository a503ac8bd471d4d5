use ethers::{
    abi::Detokenize,
    contract::ContractCall,
    providers::Middleware,
    types::{transaction::eip2718::TypedTransaction, Address, TransactionReceipt, U256, U64},
};
use log::{debug, info};

use crate::{
    exchange::{dtos::TransactionOverrides, order::ItemType, order::OrderComponents},
    helpers::domain_tag,
    prelude::*,
    Error,
};

/// A contract call that has been assembled but not sent. Callers can inspect
/// the transaction, simulate it, estimate it, or send it.
pub struct TransactionMethods<M, D> {
    call: ContractCall<M, D>,
}

impl<M: Middleware + 'static, D: Detokenize> TransactionMethods<M, D> {
    pub fn new(call: ContractCall<M, D>, overrides: Option<TransactionOverrides>) -> Self {
        let call = match overrides {
            Some(overrides) => apply_overrides(call, overrides),
            None => call,
        };
        Self { call }
    }

    /// Appends the marketplace domain's tag to the calldata
    pub fn with_domain(mut self, domain: Option<&str>) -> Self {
        if let Some(domain) = domain.filter(|d| !d.is_empty()) {
            let mut data = self.call.tx.data().map(|d| d.to_vec()).unwrap_or_default();
            data.extend_from_slice(&domain_tag(domain));
            self.call.tx.set_data(data.into());
        }
        self
    }

    pub fn build_transaction(&self) -> TypedTransaction {
        self.call.tx.clone()
    }

    pub async fn call_static(&self) -> Result<D> {
        self.call
            .call()
            .await
            .map_err(|e| Error::ContractInteraction(e.to_string()))
    }

    pub async fn estimate_gas(&self) -> Result<U256> {
        self.call
            .estimate_gas()
            .await
            .map_err(|e| Error::ContractInteraction(e.to_string()))
    }

    /// Sends the transaction and waits for it to be mined
    pub async fn transact(&self) -> Result<TransactionReceipt> {
        debug!("Sending transaction {:?}", self.call.tx);
        let receipt = self
            .call
            .send()
            .await
            .map_err(|e| Error::ContractInteraction(e.to_string()))?
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?
            .ok_or(Error::TxDropped)?;

        let tx_hash = receipt.transaction_hash;
        if receipt.status == Some(U64::zero()) {
            return Err(Error::TransactionReverted(tx_hash));
        }
        info!("Transaction confirmed: {tx_hash:#x}");
        Ok(receipt)
    }
}

fn apply_overrides<M: Middleware, D: Detokenize>(
    mut call: ContractCall<M, D>,
    overrides: TransactionOverrides,
) -> ContractCall<M, D> {
    if let Some(gas_limit) = overrides.gas_limit {
        call = call.gas(gas_limit);
    }
    if let Some(gas_price) = overrides.gas_price {
        call = call.gas_price(gas_price);
    }
    if let Some(value) = overrides.value {
        call = call.value(value);
    }
    if let Some(nonce) = overrides.nonce {
        call = call.nonce(nonce);
    }
    call
}

/// Grants an operator (Seaport or a conduit) access to a token
pub struct ApprovalAction<M> {
    pub token: Address,
    pub identifier_or_criteria: U256,
    pub item_type: ItemType,
    pub operator: Address,
    pub transaction_methods: TransactionMethods<M, ()>,
}

/// Signing the order components; performed by [`crate::Seaport::sign_order`]
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    pub order_components: OrderComponents,
}

pub struct ExchangeAction<M> {
    pub transaction_methods: TransactionMethods<M, bool>,
}

pub enum Action<'a, M> {
    Approval(&'a ApprovalAction<M>),
    Create(&'a CreateOrderAction),
    Exchange(&'a ExchangeAction<M>),
}
