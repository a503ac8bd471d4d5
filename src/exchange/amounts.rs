use std::collections::BTreeMap;

use ethers::types::{Address, U256, U512};

use crate::{
    consts::ONE_HUNDRED_PERCENT_BP,
    exchange::order::{ConsiderationItem, Item, ItemType},
    helpers::{gcd, mul_div},
    prelude::*,
    Error,
};

/// Inputs for pricing an item whose amount moves linearly over the order's
/// lifetime (dutch and english auctions)
#[derive(Debug, Clone, Copy)]
pub struct TimeBasedItemParams {
    pub start_time: U256,
    pub end_time: U256,
    pub current_block_timestamp: U256,
    pub ascending_amount_timestamp_buffer: U256,
    pub is_consideration_item: bool,
}

/// Amount of an item at the current time. Ascending amounts are evaluated a
/// buffer into the future so the transaction still covers the price when it
/// lands. Consideration amounts round up, offer amounts round down.
pub fn present_item_amount(
    start_amount: U256,
    end_amount: U256,
    params: Option<&TimeBasedItemParams>,
) -> U256 {
    if start_amount == end_amount {
        return start_amount;
    }
    let Some(params) = params else {
        return start_amount.max(end_amount);
    };

    let is_ascending = end_amount > start_amount;
    let adjusted_timestamp = if is_ascending {
        params
            .current_block_timestamp
            .saturating_add(params.ascending_amount_timestamp_buffer)
    } else {
        params.current_block_timestamp
    };

    if adjusted_timestamp < params.start_time || params.end_time <= params.start_time {
        return start_amount;
    }

    let duration = params.end_time - params.start_time;
    let elapsed = adjusted_timestamp.min(params.end_time) - params.start_time;
    let remaining = duration - elapsed;
    let round_up = if params.is_consideration_item {
        duration - 1
    } else {
        U256::zero()
    };

    let total = start_amount.full_mul(remaining)
        + end_amount.full_mul(elapsed)
        + U512::from(round_up);
    U256::try_from(total / U512::from(duration)).unwrap_or(U256::MAX)
}

pub fn multiply_basis_points(amount: U256, basis_points: u32) -> U256 {
    mul_div(amount, basis_points.into(), ONE_HUNDRED_PERCENT_BP.into())
}

/// Removes the total fee share from every currency item
pub fn deduct_fees(
    items: Vec<ConsiderationItem>,
    total_basis_points: u32,
) -> Vec<ConsiderationItem> {
    items
        .into_iter()
        .map(|mut item| {
            if item.item_type.is_currency() {
                item.start_amount -= multiply_basis_points(item.start_amount, total_basis_points);
                item.end_amount -= multiply_basis_points(item.end_amount, total_basis_points);
            }
            item
        })
        .collect()
}

pub fn fee_to_consideration_item(
    recipient: Address,
    basis_points: u32,
    token: Address,
    base_start_amount: U256,
    base_end_amount: U256,
) -> ConsiderationItem {
    ConsiderationItem {
        item_type: if token.is_zero() {
            ItemType::Native
        } else {
            ItemType::Erc20
        },
        token,
        identifier_or_criteria: U256::zero(),
        start_amount: multiply_basis_points(base_start_amount, basis_points),
        end_amount: multiply_basis_points(base_end_amount, basis_points),
        recipient,
    }
}

pub fn checked_sum(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or(Error::AmountOverflow)
}

/// Summed start and end amounts across items
pub fn total_items_amount<I: Item>(items: &[I]) -> Result<(U256, U256)> {
    items.iter().try_fold((U256::zero(), U256::zero()), |(start, end), item| {
        Ok((
            checked_sum(start, item.start_amount())?,
            checked_sum(end, item.end_amount())?,
        ))
    })
}

/// Largest unit count every item amount divides into evenly
pub fn maximum_size_for_order<'a, I, J>(offer: &'a [I], consideration: &'a [J]) -> U256
where
    I: Item,
    J: Item,
{
    let amounts = offer
        .iter()
        .flat_map(|item| [item.start_amount(), item.end_amount()])
        .chain(consideration.iter().flat_map(|item| [item.start_amount(), item.end_amount()]));
    amounts.fold(U256::zero(), gcd)
}

/// Fill fraction submitted with an advanced order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillFraction {
    pub numerator: U256,
    pub denominator: U256,
}

impl FillFraction {
    pub fn apply(&self, amount: U256) -> U256 {
        mul_div(amount, self.numerator, self.denominator)
    }

    pub fn numerator_u120(&self) -> Result<u128> {
        self.checked_u120(self.numerator)
    }

    pub fn denominator_u120(&self) -> Result<u128> {
        self.checked_u120(self.denominator)
    }

    fn checked_u120(&self, value: U256) -> Result<u128> {
        if value.bits() > 120 {
            return Err(Error::FractionOverflow(self.numerator, self.denominator));
        }
        Ok(value.as_u128())
    }
}

/// Turns a requested unit count into a reduced fill fraction, clamped to
/// what is left of the order.
pub fn fill_fraction(
    units_to_fill: U256,
    max_units: U256,
    total_filled: U256,
    total_size: U256,
) -> Result<FillFraction> {
    if units_to_fill.is_zero() || max_units.is_zero() {
        return Err(Error::InvalidUnitsToFill);
    }

    let remaining_units = if total_size.is_zero() {
        max_units
    } else {
        mul_div(max_units, total_size.saturating_sub(total_filled), total_size)
    };
    let numerator = units_to_fill.min(remaining_units);
    if numerator.is_zero() {
        return Err(Error::OrderAlreadyFilled);
    }

    let divisor = gcd(numerator, max_units);
    Ok(FillFraction {
        numerator: numerator / divisor,
        denominator: max_units / divisor,
    })
}

/// Amount required per (token, identifier), with the item type that decides
/// how balances and approvals are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredAmount {
    pub item_type: ItemType,
    pub amount: U256,
}

pub type TokenAmounts = BTreeMap<(Address, U256), RequiredAmount>;

pub fn summed_token_amounts<I: Item>(
    items: &[I],
    params: Option<&TimeBasedItemParams>,
    fraction: Option<&FillFraction>,
) -> Result<TokenAmounts> {
    let mut amounts = TokenAmounts::new();
    add_token_amounts(&mut amounts, items, params, fraction)?;
    Ok(amounts)
}

pub fn add_token_amounts<I: Item>(
    amounts: &mut TokenAmounts,
    items: &[I],
    params: Option<&TimeBasedItemParams>,
    fraction: Option<&FillFraction>,
) -> Result<()> {
    for item in items {
        let present = present_item_amount(item.start_amount(), item.end_amount(), params);
        let amount = fraction.map_or(present, |f| f.apply(present));
        let entry = amounts
            .entry((item.token(), item.identifier_or_criteria()))
            .or_insert(RequiredAmount {
                item_type: item.item_type(),
                amount: U256::zero(),
            });
        entry.amount = checked_sum(entry.amount, amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::order::OfferItem;

    fn params(now: u64, is_consideration_item: bool) -> TimeBasedItemParams {
        TimeBasedItemParams {
            start_time: 1000.into(),
            end_time: 2000.into(),
            current_block_timestamp: now.into(),
            ascending_amount_timestamp_buffer: 0.into(),
            is_consideration_item,
        }
    }

    #[test]
    fn static_amounts_ignore_time() {
        let amount = present_item_amount(10.into(), 10.into(), Some(&params(1500, true)));
        assert_eq!(amount, 10.into());
        assert_eq!(present_item_amount(3.into(), 9.into(), None), 9.into());
    }

    #[test]
    fn descending_amount_interpolates() {
        let p = params(1250, false);
        assert_eq!(present_item_amount(1000.into(), 0.into(), Some(&p)), 750.into());
        // before start and after end clamp to the endpoints
        let early = params(10, false);
        let late = params(5000, false);
        assert_eq!(present_item_amount(1000.into(), 0.into(), Some(&early)), 1000.into());
        assert_eq!(present_item_amount(1000.into(), 0.into(), Some(&late)), 0.into());
    }

    #[test]
    fn consideration_rounds_up() {
        // 10 -> 0 over 1000s at 1/3 of the way: 6.67 rounds to 7 for consideration, 6 for offer
        let start = U256::from(10);
        let end = U256::zero();
        let mut p = params(0, true);
        p.start_time = 0.into();
        p.end_time = 3.into();
        p.current_block_timestamp = 1.into();
        assert_eq!(present_item_amount(start, end, Some(&p)), 7.into());
        p.is_consideration_item = false;
        assert_eq!(present_item_amount(start, end, Some(&p)), 6.into());
    }

    #[test]
    fn ascending_amount_uses_buffer() {
        let mut p = params(1000, true);
        p.ascending_amount_timestamp_buffer = 500.into();
        assert_eq!(present_item_amount(0.into(), 1000.into(), Some(&p)), 500.into());
    }

    #[test]
    fn fees_are_deducted_from_currency_items() {
        let item = ConsiderationItem {
            item_type: ItemType::Native,
            token: Address::zero(),
            identifier_or_criteria: 0.into(),
            start_amount: U256::exp10(19),
            end_amount: U256::exp10(19),
            recipient: Address::repeat_byte(1),
        };
        let nft = ConsiderationItem {
            item_type: ItemType::Erc721,
            token: Address::repeat_byte(9),
            identifier_or_criteria: 1.into(),
            start_amount: 1.into(),
            end_amount: 1.into(),
            recipient: Address::repeat_byte(1),
        };
        let deducted = deduct_fees(vec![item, nft.clone()], 250);
        assert_eq!(deducted[0].start_amount, U256::from(9_750_000_000_000_000_000u128));
        assert_eq!(deducted[1], nft);
    }

    #[test]
    fn maximum_size_is_gcd_of_amounts() {
        let offer = vec![OfferItem {
            item_type: ItemType::Erc1155,
            token: Address::repeat_byte(2),
            identifier_or_criteria: 1.into(),
            start_amount: 10.into(),
            end_amount: 10.into(),
        }];
        let consideration = vec![ConsiderationItem {
            item_type: ItemType::Native,
            token: Address::zero(),
            identifier_or_criteria: 0.into(),
            start_amount: 1000.into(),
            end_amount: 1000.into(),
            recipient: Address::repeat_byte(1),
        }];
        assert_eq!(maximum_size_for_order(&offer, &consideration), 10.into());
    }

    #[test]
    fn fill_fraction_is_reduced_and_clamped() {
        let fraction = fill_fraction(4.into(), 10.into(), 0.into(), 0.into()).unwrap();
        assert_eq!(fraction, FillFraction { numerator: 2.into(), denominator: 5.into() });

        // 7 of 10 already filled leaves 3 units
        let fraction = fill_fraction(5.into(), 10.into(), 7.into(), 10.into()).unwrap();
        assert_eq!(fraction, FillFraction { numerator: 3.into(), denominator: 10.into() });

        assert!(fill_fraction(0.into(), 10.into(), 0.into(), 0.into()).is_err());
        assert!(fill_fraction(1.into(), 10.into(), 10.into(), 10.into()).is_err());
    }

    #[test]
    fn token_amounts_are_summed_per_identifier() {
        let offer = vec![
            OfferItem {
                item_type: ItemType::Erc20,
                token: Address::repeat_byte(3),
                identifier_or_criteria: 0.into(),
                start_amount: 5.into(),
                end_amount: 5.into(),
            },
            OfferItem {
                item_type: ItemType::Erc20,
                token: Address::repeat_byte(3),
                identifier_or_criteria: 0.into(),
                start_amount: 7.into(),
                end_amount: 7.into(),
            },
        ];
        let fraction = FillFraction { numerator: 1.into(), denominator: 2.into() };
        let amounts = summed_token_amounts(&offer, None, Some(&fraction)).unwrap();
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[&(Address::repeat_byte(3), U256::zero())].amount, 5.into());
    }

    #[test]
    fn oversized_sums_are_errors() {
        let half_plus_one = U256::MAX / 2 + 1;
        let consideration = vec![
            ConsiderationItem {
                item_type: ItemType::Native,
                token: Address::zero(),
                identifier_or_criteria: 0.into(),
                start_amount: half_plus_one,
                end_amount: half_plus_one,
                recipient: Address::repeat_byte(1),
            };
            2
        ];

        assert!(matches!(
            summed_token_amounts(&consideration, None, None),
            Err(Error::AmountOverflow)
        ));
        assert!(matches!(total_items_amount(&consideration), Err(Error::AmountOverflow)));
        assert_eq!(
            total_items_amount(&consideration[..1]).unwrap(),
            (half_plus_one, half_plus_one)
        );
    }
}
