use ethers::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

use crate::{
    exchange::order::OrderWithCounter,
    helpers::{serde_opt_u256, serde_u256},
};

/// An item as callers describe it when creating an order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CreateInputItem {
    /// Native currency when `token` is absent, ERC20 otherwise
    #[serde(rename_all = "camelCase")]
    Currency {
        #[serde(with = "serde_u256")]
        amount: U256,
        #[serde(default, with = "serde_opt_u256")]
        end_amount: Option<U256>,
        #[serde(default)]
        token: Option<Address>,
    },
    Erc721 {
        token: Address,
        #[serde(with = "serde_u256")]
        identifier: U256,
    },
    #[serde(rename_all = "camelCase")]
    Erc1155 {
        token: Address,
        #[serde(with = "serde_u256")]
        identifier: U256,
        #[serde(with = "serde_u256")]
        amount: U256,
        #[serde(default, with = "serde_opt_u256")]
        end_amount: Option<U256>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConsiderationInputItem {
    pub item: CreateInputItem,
    /// Defaults to the offerer
    pub recipient: Option<Address>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TipInputItem {
    pub item: CreateInputItem,
    pub recipient: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub recipient: Address,
    pub basis_points: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderInput {
    pub conduit_key: Option<H256>,
    pub zone: Option<Address>,
    #[serde(with = "serde_opt_u256")]
    pub start_time: Option<U256>,
    #[serde(with = "serde_opt_u256")]
    pub end_time: Option<U256>,
    pub offer: Vec<CreateInputItem>,
    pub consideration: Vec<ConsiderationInputItem>,
    #[serde(with = "serde_opt_u256")]
    pub counter: Option<U256>,
    pub fees: Vec<Fee>,
    pub allow_partial_fills: bool,
    pub restricted_by_zone: bool,
    pub zone_hash: Option<H256>,
    #[serde(with = "serde_opt_u256")]
    pub salt: Option<U256>,
    /// Marketplace tag folded into the salt
    pub domain: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FulfillOrderInput {
    pub order: OrderWithCounter,
    #[serde(default, with = "serde_opt_u256")]
    pub units_to_fill: Option<U256>,
    #[serde(default)]
    pub tips: Vec<TipInputItem>,
    #[serde(default)]
    pub extra_data: Bytes,
    pub account_address: Option<Address>,
    pub conduit_key: Option<H256>,
    pub recipient_address: Option<Address>,
    /// Marketplace tag appended to the calldata
    pub domain: Option<String>,
}

impl FulfillOrderInput {
    pub fn new(order: OrderWithCounter) -> Self {
        Self {
            order,
            units_to_fill: None,
            tips: vec![],
            extra_data: Bytes::default(),
            account_address: None,
            conduit_key: None,
            recipient_address: None,
            domain: None,
        }
    }

    pub fn account_address(mut self, account: Address) -> Self {
        self.account_address = Some(account);
        self
    }
}

/// Caller-chosen transaction fields applied on top of the contract call
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOverrides {
    #[serde(default, with = "serde_opt_u256")]
    pub gas_limit: Option<U256>,
    #[serde(default, with = "serde_opt_u256")]
    pub gas_price: Option<U256>,
    #[serde(default, with = "serde_opt_u256")]
    pub value: Option<U256>,
    #[serde(default, with = "serde_opt_u256")]
    pub nonce: Option<U256>,
}

impl TransactionOverrides {
    pub fn gas_limit(gas_limit: impl Into<U256>) -> Self {
        Self {
            gas_limit: Some(gas_limit.into()),
            ..Default::default()
        }
    }
}
