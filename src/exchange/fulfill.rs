use ethers::{
    providers::Middleware,
    types::{Address, Bytes, TransactionReceipt, H256, U256},
};
use log::debug;

use crate::{
    abi::seaport as abi,
    exchange::{
        actions::{Action, ApprovalAction, ExchangeAction, TransactionMethods},
        amounts::{
            add_token_amounts, checked_sum, fill_fraction, maximum_size_for_order,
            summed_token_amounts, FillFraction, TimeBasedItemParams, TokenAmounts,
        },
        balance::{
            approval_actions, balances_and_approvals, has_sufficient_balances,
            insufficient_approvals,
        },
        dtos::{FulfillOrderInput, TransactionOverrides},
        order::{ConsiderationItem, ItemType, OrderParameters, OrderStatus, OrderWithCounter},
    },
    prelude::*,
    Error, Seaport,
};

pub fn check_order_status(status: &OrderStatus) -> Result<()> {
    if status.is_cancelled {
        return Err(Error::OrderCancelled);
    }
    if status.is_fully_filled() {
        return Err(Error::OrderAlreadyFilled);
    }
    Ok(())
}

/// Rejects orders the contract would refuse to fill
pub fn check_fulfillable(
    order: &OrderWithCounter,
    status: &OrderStatus,
    timestamp: U256,
) -> Result<()> {
    check_order_status(status)?;
    if !order.parameters.is_active_at(timestamp) {
        return Err(Error::OrderInactive);
    }
    Ok(())
}

/// Native currency the fulfiller has to attach
pub fn native_value(required: &TokenAmounts) -> Result<U256> {
    required
        .values()
        .filter(|r| r.item_type == ItemType::Native)
        .try_fold(U256::zero(), |acc, r| checked_sum(acc, r.amount))
}

/// Parameters submitted for fulfillment: the original consideration items
/// followed by the tips
pub fn parameters_with_tips(
    order: &OrderWithCounter,
    tips: &[ConsiderationItem],
) -> OrderParameters {
    let mut parameters = OrderParameters::from(&order.parameters);
    parameters.consideration.extend_from_slice(tips);
    parameters
}

impl<M: Middleware + 'static> Seaport<M> {
    /// Prepares fulfillment of a single order. The fulfiller's missing
    /// approvals come back as actions that run before the exchange call.
    pub async fn fulfill_order(
        &self,
        input: FulfillOrderInput,
        overrides: Option<TransactionOverrides>,
    ) -> Result<FulfillOrderUseCase<M>> {
        let order_hash = self.get_order_hash(&input.order.parameters);
        let status = self.get_order_status(order_hash).await?;
        check_order_status(&status)?;

        let timestamp = self.current_block_timestamp().await?;
        self.prepare_fulfillment(input, status, timestamp, overrides)
            .await
    }

    pub(crate) async fn prepare_fulfillment(
        &self,
        input: FulfillOrderInput,
        status: OrderStatus,
        timestamp: U256,
        overrides: Option<TransactionOverrides>,
    ) -> Result<FulfillOrderUseCase<M>> {
        let FulfillOrderInput {
            mut order,
            units_to_fill,
            tips,
            extra_data,
            account_address,
            conduit_key,
            recipient_address,
            domain,
        } = input;

        let fulfiller = self.resolve_account(account_address)?;
        let offerer = order.parameters.offerer;
        let offerer_operator = self.conduit_address(order.parameters.conduit_key)?;
        let fulfiller_conduit_key = conduit_key.unwrap_or(self.config.default_conduit_key);
        let fulfiller_operator = self.conduit_address(fulfiller_conduit_key)?;
        let order_hash = self.get_order_hash(&order.parameters);

        check_fulfillable(&order, &status, timestamp)?;
        // The contract skips signature checks for validated orders
        if status.is_validated {
            order.signature = Bytes::default();
        }

        let fraction = match units_to_fill {
            Some(units) => {
                if !order.parameters.order_type.allows_partial_fills() {
                    return Err(Error::InvalidUnitsToFill);
                }
                let max_units = maximum_size_for_order(
                    &order.parameters.offer,
                    &order.parameters.consideration,
                );
                Some(fill_fraction(units, max_units, status.total_filled, status.total_size)?)
            }
            None => None,
        };

        let offer_params = TimeBasedItemParams {
            start_time: order.parameters.start_time,
            end_time: order.parameters.end_time,
            current_block_timestamp: timestamp,
            ascending_amount_timestamp_buffer: self
                .config
                .ascending_amount_fulfillment_buffer
                .into(),
            is_consideration_item: false,
        };
        let consideration_params = TimeBasedItemParams {
            is_consideration_item: true,
            ..offer_params
        };
        let tip_items: Vec<ConsiderationItem> =
            tips.iter().map(|t| t.to_consideration_item()).collect();

        let offer_required = summed_token_amounts(
            &order.parameters.offer,
            Some(&offer_params),
            fraction.as_ref(),
        )?;
        let mut fulfiller_required = summed_token_amounts(
            &order.parameters.consideration,
            Some(&consideration_params),
            fraction.as_ref(),
        )?;
        add_token_amounts(
            &mut fulfiller_required,
            &tip_items,
            Some(&consideration_params),
            None,
        )?;
        let value = native_value(&fulfiller_required)?;

        let offerer_balances =
            balances_and_approvals(&self.provider, offerer, &offer_required, offerer_operator)
                .await?;
        if !has_sufficient_balances(&offerer_balances, &offer_required) {
            return Err(Error::InsufficientOffererBalance);
        }
        if !insufficient_approvals(&offerer_balances, &offer_required).is_empty() {
            return Err(Error::InsufficientOffererApprovals);
        }

        let fulfiller_balances = balances_and_approvals(
            &self.provider,
            fulfiller,
            &fulfiller_required,
            fulfiller_operator,
        )
        .await?;
        if !has_sufficient_balances(&fulfiller_balances, &fulfiller_required) {
            return Err(Error::InsufficientFulfillerBalance);
        }
        let insufficient = insufficient_approvals(&fulfiller_balances, &fulfiller_required);
        let approval_actions =
            approval_actions(&self.provider, fulfiller, &insufficient, fulfiller_operator);

        let parameters = parameters_with_tips(&order, &tip_items);
        let use_advanced = fraction.is_some()
            || !tip_items.is_empty()
            || !extra_data.is_empty()
            || recipient_address.is_some();

        let call = if use_advanced {
            let fraction = fraction.unwrap_or(FillFraction {
                numerator: U256::one(),
                denominator: U256::one(),
            });
            let advanced_order = abi::AdvancedOrder {
                parameters: (&parameters).into(),
                numerator: fraction.numerator_u120()?,
                denominator: fraction.denominator_u120()?,
                signature: order.signature.clone(),
                extra_data,
            };
            self.contract.fulfill_advanced_order(
                advanced_order,
                vec![],
                fulfiller_conduit_key.0,
                recipient_address.unwrap_or_else(Address::zero),
            )
        } else {
            let abi_order = abi::Order {
                parameters: (&parameters).into(),
                signature: order.signature.clone(),
            };
            self.contract.fulfill_order(abi_order, fulfiller_conduit_key.0)
        };
        debug!(
            "Fulfilling {order_hash:#x} for {fulfiller:#x}, value {value}, {} approval(s)",
            approval_actions.len()
        );

        let call = call.from(fulfiller).value(value);
        Ok(FulfillOrderUseCase {
            approval_actions,
            exchange_action: ExchangeAction {
                transaction_methods: TransactionMethods::new(call, overrides)
                    .with_domain(domain.as_deref()),
            },
            order_hash,
        })
    }
}

pub struct FulfillOrderUseCase<M> {
    pub approval_actions: Vec<ApprovalAction<M>>,
    pub exchange_action: ExchangeAction<M>,
    pub order_hash: H256,
}

impl<M: Middleware + 'static> FulfillOrderUseCase<M> {
    pub fn actions(&self) -> Vec<Action<'_, M>> {
        self.approval_actions
            .iter()
            .map(Action::Approval)
            .chain(std::iter::once(Action::Exchange(&self.exchange_action)))
            .collect()
    }

    /// Sends the approvals in order, then the fulfillment
    pub async fn execute_all_actions(&self) -> Result<TransactionReceipt> {
        for approval in &self.approval_actions {
            approval.transaction_methods.transact().await?;
        }
        self.exchange_action.transaction_methods.transact().await
    }
}
