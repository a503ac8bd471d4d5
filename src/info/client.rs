use ethers::{
    providers::Middleware,
    types::{Address, H256, U256},
};

use crate::{
    eip712::Eip712,
    exchange::order::{OrderComponents, OrderStatus},
    prelude::*,
    Error, Seaport,
};

impl<M: Middleware + 'static> Seaport<M> {
    /// Current counter of an offerer. Orders signed against a lower counter
    /// can no longer be fulfilled.
    pub async fn get_counter(&self, offerer: Address) -> Result<U256> {
        self.contract
            .get_counter(offerer)
            .call()
            .await
            .map_err(|e| Error::ContractInteraction(e.to_string()))
    }

    pub async fn get_order_status(&self, order_hash: H256) -> Result<OrderStatus> {
        self.contract
            .get_order_status(order_hash.0)
            .call()
            .await
            .map(OrderStatus::from)
            .map_err(|e| Error::ContractInteraction(e.to_string()))
    }

    /// Order hash as the contract computes it, without a round trip
    pub fn get_order_hash(&self, order_components: &OrderComponents) -> H256 {
        order_components.struct_hash()
    }
}
