use ethers::types::{Address, H256, U256};

use crate::{
    consts::{MAX_INT, ONE_HUNDRED_PERCENT_BP},
    exchange::{
        amounts::{checked_sum, deduct_fees, fee_to_consideration_item, total_items_amount},
        dtos::{CreateInputItem, CreateOrderInput, TipInputItem},
        order::{ConsiderationItem, ItemType, OfferItem, OrderComponents, OrderType},
    },
    helpers::generate_random_salt,
    prelude::*,
    Error,
};

impl CreateInputItem {
    pub fn to_offer_item(&self) -> OfferItem {
        match *self {
            CreateInputItem::Currency {
                amount,
                end_amount,
                token,
            } => {
                let token = token.unwrap_or_default();
                OfferItem {
                    item_type: if token.is_zero() {
                        ItemType::Native
                    } else {
                        ItemType::Erc20
                    },
                    token,
                    identifier_or_criteria: U256::zero(),
                    start_amount: amount,
                    end_amount: end_amount.unwrap_or(amount),
                }
            }
            CreateInputItem::Erc721 { token, identifier } => OfferItem {
                item_type: ItemType::Erc721,
                token,
                identifier_or_criteria: identifier,
                start_amount: U256::one(),
                end_amount: U256::one(),
            },
            CreateInputItem::Erc1155 {
                token,
                identifier,
                amount,
                end_amount,
            } => OfferItem {
                item_type: ItemType::Erc1155,
                token,
                identifier_or_criteria: identifier,
                start_amount: amount,
                end_amount: end_amount.unwrap_or(amount),
            },
        }
    }

    pub fn to_consideration_item(&self, recipient: Address) -> ConsiderationItem {
        let OfferItem {
            item_type,
            token,
            identifier_or_criteria,
            start_amount,
            end_amount,
        } = self.to_offer_item();
        ConsiderationItem {
            item_type,
            token,
            identifier_or_criteria,
            start_amount,
            end_amount,
            recipient,
        }
    }
}

impl TipInputItem {
    pub fn to_consideration_item(&self) -> ConsiderationItem {
        self.item.to_consideration_item(self.recipient)
    }
}

/// Maps a creation request onto the components the offerer signs. Fees are
/// carved out of every currency consideration item and paid in the order's
/// single currency.
pub fn build_order_components(
    input: &CreateOrderInput,
    offerer: Address,
    counter: U256,
    conduit_key: H256,
    now: U256,
) -> Result<OrderComponents> {
    let offer: Vec<OfferItem> = input.offer.iter().map(CreateInputItem::to_offer_item).collect();
    let consideration: Vec<ConsiderationItem> = input
        .consideration
        .iter()
        .map(|c| c.item.to_consideration_item(c.recipient.unwrap_or(offerer)))
        .collect();

    let currency_offer: Vec<&OfferItem> = offer
        .iter()
        .filter(|i| i.item_type.is_currency())
        .collect();
    let currency_consideration: Vec<&ConsiderationItem> = consideration
        .iter()
        .filter(|i| i.item_type.is_currency())
        .collect();

    let mut currency_tokens = currency_offer
        .iter()
        .map(|i| i.token)
        .chain(currency_consideration.iter().map(|i| i.token));
    let currency_token = currency_tokens.next();
    if let Some(first) = currency_token {
        if currency_tokens.any(|token| token != first) {
            return Err(Error::MixedCurrencies);
        }
    }

    let total_basis_points = input
        .fees
        .iter()
        .fold(0u32, |total, fee| total.saturating_add(fee.basis_points));
    if total_basis_points > ONE_HUNDRED_PERCENT_BP {
        return Err(Error::FeesExceedTotal(total_basis_points));
    }

    let (offer_start, offer_end) = total_items_amount(&currency_offer)?;
    let (consideration_start, consideration_end) = total_items_amount(&currency_consideration)?;
    let base_start = checked_sum(offer_start, consideration_start)?;
    let base_end = checked_sum(offer_end, consideration_end)?;

    let mut consideration_with_fees = deduct_fees(consideration, total_basis_points);
    if let Some(token) = currency_token {
        consideration_with_fees.extend(input.fees.iter().map(|fee| {
            fee_to_consideration_item(
                fee.recipient,
                fee.basis_points,
                token,
                base_start,
                base_end,
            )
        }));
    }

    Ok(OrderComponents {
        offerer,
        zone: input.zone.unwrap_or_default(),
        offer,
        consideration: consideration_with_fees,
        order_type: OrderType::from_options(input.allow_partial_fills, input.restricted_by_zone),
        start_time: input.start_time.unwrap_or(now),
        end_time: input.end_time.unwrap_or(MAX_INT),
        zone_hash: input.zone_hash.unwrap_or_default(),
        salt: input
            .salt
            .unwrap_or_else(|| generate_random_salt(input.domain.as_deref())),
        conduit_key,
        counter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::NO_CONDUIT,
        exchange::dtos::{ConsiderationInputItem, Fee},
    };

    fn offerer() -> Address {
        Address::repeat_byte(0x0f)
    }

    fn zone() -> Address {
        Address::repeat_byte(0x20)
    }

    fn nft_for_ether_input() -> CreateOrderInput {
        CreateOrderInput {
            start_time: Some(U256::zero()),
            offer: vec![CreateInputItem::Erc721 {
                token: Address::repeat_byte(0x72),
                identifier: 1.into(),
            }],
            consideration: vec![ConsiderationInputItem {
                item: CreateInputItem::Currency {
                    amount: U256::exp10(19),
                    end_amount: None,
                    token: None,
                },
                recipient: Some(offerer()),
            }],
            // 2.5% fee
            fees: vec![Fee {
                recipient: zone(),
                basis_points: 250,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn fee_is_split_out_of_the_price() {
        let components = build_order_components(
            &nft_for_ether_input(),
            offerer(),
            U256::from(2),
            NO_CONDUIT,
            U256::from(1_700_000_000u64),
        )
        .unwrap();

        assert_eq!(components.offer.len(), 1);
        assert_eq!(components.offer[0].item_type, ItemType::Erc721);
        assert_eq!(components.offer[0].start_amount, U256::one());

        assert_eq!(components.consideration.len(), 2);
        let seller = &components.consideration[0];
        assert_eq!(seller.item_type, ItemType::Native);
        assert_eq!(seller.recipient, offerer());
        assert_eq!(seller.start_amount, U256::from(9_750_000_000_000_000_000u128));

        let fee = &components.consideration[1];
        assert_eq!(fee.recipient, zone());
        assert_eq!(fee.start_amount, U256::from(250_000_000_000_000_000u128));
        assert_eq!(fee.end_amount, fee.start_amount);
    }

    #[test]
    fn defaults_are_filled_in() {
        let mut input = nft_for_ether_input();
        input.start_time = None;
        let components =
            build_order_components(&input, offerer(), 5.into(), NO_CONDUIT, 1234.into()).unwrap();

        assert_eq!(components.start_time, 1234.into());
        assert_eq!(components.end_time, MAX_INT);
        assert_eq!(components.zone, Address::zero());
        assert_eq!(components.counter, 5.into());
        assert_eq!(components.order_type, OrderType::FullOpen);
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let mut input = nft_for_ether_input();
        input.consideration.push(ConsiderationInputItem {
            item: CreateInputItem::Currency {
                amount: 1.into(),
                end_amount: None,
                token: Some(Address::repeat_byte(0x20)),
            },
            recipient: None,
        });
        let err = build_order_components(&input, offerer(), 0.into(), NO_CONDUIT, 0.into());
        assert!(matches!(err, Err(Error::MixedCurrencies)));
    }

    #[test]
    fn fees_over_one_hundred_percent_are_rejected() {
        let mut input = nft_for_ether_input();
        input.fees.push(Fee {
            recipient: zone(),
            basis_points: 9_800,
        });
        let err = build_order_components(&input, offerer(), 0.into(), NO_CONDUIT, 0.into());
        assert!(matches!(err, Err(Error::FeesExceedTotal(10_050))));
    }

    #[test]
    fn consideration_recipient_defaults_to_offerer() {
        let mut input = nft_for_ether_input();
        input.consideration[0].recipient = None;
        input.fees.clear();
        input.allow_partial_fills = true;
        let components =
            build_order_components(&input, offerer(), 0.into(), NO_CONDUIT, 0.into()).unwrap();
        assert_eq!(components.consideration.len(), 1);
        assert_eq!(components.consideration[0].recipient, offerer());
        assert_eq!(components.order_type, OrderType::PartialOpen);
    }

    #[test]
    fn overflowing_prices_are_rejected() {
        let mut input = nft_for_ether_input();
        let price = ConsiderationInputItem {
            item: CreateInputItem::Currency {
                amount: U256::MAX / 2 + 1,
                end_amount: None,
                token: None,
            },
            recipient: None,
        };
        input.consideration = vec![price.clone(), price];
        let err = build_order_components(&input, offerer(), 0.into(), NO_CONDUIT, 0.into());
        assert!(matches!(err, Err(Error::AmountOverflow)));
    }
}
