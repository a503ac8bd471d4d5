use ethers::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

use crate::{abi::seaport as abi, helpers::serde_u256, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ItemType {
    Native = 0,
    Erc20 = 1,
    Erc721 = 2,
    Erc1155 = 3,
    Erc721WithCriteria = 4,
    Erc1155WithCriteria = 5,
}

impl ItemType {
    pub fn is_currency(self) -> bool {
        matches!(self, ItemType::Native | ItemType::Erc20)
    }

    pub fn is_nft(self) -> bool {
        !self.is_currency()
    }
}

impl TryFrom<u8> for ItemType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => ItemType::Native,
            1 => ItemType::Erc20,
            2 => ItemType::Erc721,
            3 => ItemType::Erc1155,
            4 => ItemType::Erc721WithCriteria,
            5 => ItemType::Erc1155WithCriteria,
            other => return Err(Error::UnknownItemType(other)),
        })
    }
}

impl From<ItemType> for u8 {
    fn from(value: ItemType) -> Self {
        value as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderType {
    FullOpen = 0,
    PartialOpen = 1,
    FullRestricted = 2,
    PartialRestricted = 3,
    Contract = 4,
}

impl OrderType {
    pub fn from_options(allow_partial_fills: bool, restricted_by_zone: bool) -> Self {
        match (allow_partial_fills, restricted_by_zone) {
            (false, false) => OrderType::FullOpen,
            (true, false) => OrderType::PartialOpen,
            (false, true) => OrderType::FullRestricted,
            (true, true) => OrderType::PartialRestricted,
        }
    }

    pub fn allows_partial_fills(self) -> bool {
        matches!(self, OrderType::PartialOpen | OrderType::PartialRestricted)
    }
}

impl TryFrom<u8> for OrderType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => OrderType::FullOpen,
            1 => OrderType::PartialOpen,
            2 => OrderType::FullRestricted,
            3 => OrderType::PartialRestricted,
            4 => OrderType::Contract,
            other => return Err(Error::UnknownOrderType(other)),
        })
    }
}

impl From<OrderType> for u8 {
    fn from(value: OrderType) -> Self {
        value as u8
    }
}

/// Accessors shared by offer and consideration items
pub trait Item {
    fn item_type(&self) -> ItemType;
    fn token(&self) -> Address;
    fn identifier_or_criteria(&self) -> U256;
    fn start_amount(&self) -> U256;
    fn end_amount(&self) -> U256;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferItem {
    pub item_type: ItemType,
    pub token: Address,
    #[serde(with = "serde_u256")]
    pub identifier_or_criteria: U256,
    #[serde(with = "serde_u256")]
    pub start_amount: U256,
    #[serde(with = "serde_u256")]
    pub end_amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsiderationItem {
    pub item_type: ItemType,
    pub token: Address,
    #[serde(with = "serde_u256")]
    pub identifier_or_criteria: U256,
    #[serde(with = "serde_u256")]
    pub start_amount: U256,
    #[serde(with = "serde_u256")]
    pub end_amount: U256,
    pub recipient: Address,
}

macro_rules! impl_item {
    ($ty:ty) => {
        impl Item for $ty {
            fn item_type(&self) -> ItemType {
                self.item_type
            }
            fn token(&self) -> Address {
                self.token
            }
            fn identifier_or_criteria(&self) -> U256 {
                self.identifier_or_criteria
            }
            fn start_amount(&self) -> U256 {
                self.start_amount
            }
            fn end_amount(&self) -> U256 {
                self.end_amount
            }
        }
    };
}

impl_item!(OfferItem);
impl_item!(ConsiderationItem);

impl<T: Item> Item for &T {
    fn item_type(&self) -> ItemType {
        T::item_type(*self)
    }
    fn token(&self) -> Address {
        T::token(*self)
    }
    fn identifier_or_criteria(&self) -> U256 {
        T::identifier_or_criteria(*self)
    }
    fn start_amount(&self) -> U256 {
        T::start_amount(*self)
    }
    fn end_amount(&self) -> U256 {
        T::end_amount(*self)
    }
}

/// The signed portion of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderComponents {
    pub offerer: Address,
    pub zone: Address,
    pub offer: Vec<OfferItem>,
    pub consideration: Vec<ConsiderationItem>,
    pub order_type: OrderType,
    #[serde(with = "serde_u256")]
    pub start_time: U256,
    #[serde(with = "serde_u256")]
    pub end_time: U256,
    pub zone_hash: H256,
    #[serde(with = "serde_u256")]
    pub salt: U256,
    pub conduit_key: H256,
    #[serde(with = "serde_u256")]
    pub counter: U256,
}

impl OrderComponents {
    pub fn is_active_at(&self, timestamp: U256) -> bool {
        self.start_time <= timestamp && timestamp < self.end_time
    }
}

/// Order parameters as submitted to the contract. The counter is looked up
/// on chain; `total_original_consideration_items` marks where tips begin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParameters {
    pub offerer: Address,
    pub zone: Address,
    pub offer: Vec<OfferItem>,
    pub consideration: Vec<ConsiderationItem>,
    pub order_type: OrderType,
    #[serde(with = "serde_u256")]
    pub start_time: U256,
    #[serde(with = "serde_u256")]
    pub end_time: U256,
    pub zone_hash: H256,
    #[serde(with = "serde_u256")]
    pub salt: U256,
    pub conduit_key: H256,
    #[serde(with = "serde_u256")]
    pub total_original_consideration_items: U256,
}

impl From<&OrderComponents> for OrderParameters {
    fn from(components: &OrderComponents) -> Self {
        OrderParameters {
            offerer: components.offerer,
            zone: components.zone,
            offer: components.offer.clone(),
            consideration: components.consideration.clone(),
            order_type: components.order_type,
            start_time: components.start_time,
            end_time: components.end_time,
            zone_hash: components.zone_hash,
            salt: components.salt,
            conduit_key: components.conduit_key,
            total_original_consideration_items: components.consideration.len().into(),
        }
    }
}

/// A signed order together with the counter it was signed against. An empty
/// signature is valid for orders validated on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithCounter {
    pub parameters: OrderComponents,
    pub signature: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub is_validated: bool,
    pub is_cancelled: bool,
    #[serde(with = "serde_u256")]
    pub total_filled: U256,
    #[serde(with = "serde_u256")]
    pub total_size: U256,
}

impl OrderStatus {
    pub fn is_fully_filled(&self) -> bool {
        !self.total_size.is_zero() && self.total_filled == self.total_size
    }
}

impl From<(bool, bool, U256, U256)> for OrderStatus {
    fn from(status: (bool, bool, U256, U256)) -> Self {
        let (is_validated, is_cancelled, total_filled, total_size) = status;
        OrderStatus {
            is_validated,
            is_cancelled,
            total_filled,
            total_size,
        }
    }
}

// ---------------------
// | ABI conversions   |
// ---------------------

impl From<&OfferItem> for abi::OfferItem {
    fn from(item: &OfferItem) -> Self {
        abi::OfferItem {
            item_type: item.item_type.into(),
            token: item.token,
            identifier_or_criteria: item.identifier_or_criteria,
            start_amount: item.start_amount,
            end_amount: item.end_amount,
        }
    }
}

impl From<&ConsiderationItem> for abi::ConsiderationItem {
    fn from(item: &ConsiderationItem) -> Self {
        abi::ConsiderationItem {
            item_type: item.item_type.into(),
            token: item.token,
            identifier_or_criteria: item.identifier_or_criteria,
            start_amount: item.start_amount,
            end_amount: item.end_amount,
            recipient: item.recipient,
        }
    }
}

impl From<&OrderComponents> for abi::OrderComponents {
    fn from(components: &OrderComponents) -> Self {
        abi::OrderComponents {
            offerer: components.offerer,
            zone: components.zone,
            offer: components.offer.iter().map(Into::into).collect(),
            consideration: components.consideration.iter().map(Into::into).collect(),
            order_type: components.order_type.into(),
            start_time: components.start_time,
            end_time: components.end_time,
            zone_hash: components.zone_hash.0,
            salt: components.salt,
            conduit_key: components.conduit_key.0,
            counter: components.counter,
        }
    }
}

impl From<&OrderParameters> for abi::OrderParameters {
    fn from(parameters: &OrderParameters) -> Self {
        abi::OrderParameters {
            offerer: parameters.offerer,
            zone: parameters.zone,
            offer: parameters.offer.iter().map(Into::into).collect(),
            consideration: parameters.consideration.iter().map(Into::into).collect(),
            order_type: parameters.order_type.into(),
            start_time: parameters.start_time,
            end_time: parameters.end_time,
            zone_hash: parameters.zone_hash.0,
            salt: parameters.salt,
            conduit_key: parameters.conduit_key.0,
            total_original_consideration_items: parameters.total_original_consideration_items,
        }
    }
}

impl From<&OrderWithCounter> for abi::Order {
    fn from(order: &OrderWithCounter) -> Self {
        abi::Order {
            parameters: (&OrderParameters::from(&order.parameters)).into(),
            signature: order.signature.clone(),
        }
    }
}
