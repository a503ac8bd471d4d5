use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use log::debug;

use crate::{
    abi::seaport as abi,
    exchange::{
        actions::TransactionMethods,
        dtos::TransactionOverrides,
        order::{OrderComponents, OrderWithCounter},
    },
    prelude::*,
    Seaport,
};

impl<M: Middleware + 'static> Seaport<M> {
    /// Registers orders on chain so they can be fulfilled without a
    /// signature. Must be sent by the offerer unless signatures are attached.
    pub fn validate(
        &self,
        orders: &[OrderWithCounter],
        account_address: Option<Address>,
        domain: Option<&str>,
        overrides: Option<TransactionOverrides>,
    ) -> Result<TransactionMethods<M, bool>> {
        let account = self.resolve_account(account_address)?;
        let orders: Vec<abi::Order> = orders.iter().map(abi::Order::from).collect();
        debug!("Validating {} order(s) from {account:#x}", orders.len());

        let call = self.contract.validate(orders).from(account);
        Ok(TransactionMethods::new(call, overrides).with_domain(domain))
    }

    /// Cancels specific orders. Only the offerer or the zone may cancel.
    pub fn cancel_orders(
        &self,
        orders: &[OrderComponents],
        account_address: Option<Address>,
        domain: Option<&str>,
        overrides: Option<TransactionOverrides>,
    ) -> Result<TransactionMethods<M, bool>> {
        let account = self.resolve_account(account_address)?;
        let orders: Vec<abi::OrderComponents> =
            orders.iter().map(abi::OrderComponents::from).collect();
        debug!("Cancelling {} order(s) from {account:#x}", orders.len());

        let call = self.contract.cancel(orders).from(account);
        Ok(TransactionMethods::new(call, overrides).with_domain(domain))
    }

    /// Increments the offerer's counter, cancelling every order signed
    /// against the current one
    pub fn bulk_cancel_orders(
        &self,
        offerer: Option<Address>,
        domain: Option<&str>,
        overrides: Option<TransactionOverrides>,
    ) -> Result<TransactionMethods<M, U256>> {
        let offerer = self.resolve_account(offerer)?;
        debug!("Incrementing counter of {offerer:#x}");

        let call = self.contract.increment_counter().from(offerer);
        Ok(TransactionMethods::new(call, overrides).with_domain(domain))
    }
}
