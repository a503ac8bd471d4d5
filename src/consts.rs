use ethers::types::{Address, H160, H256, U256};
use ethers::utils::keccak256;
use lazy_static::lazy_static;

pub const SEAPORT_CONTRACT_NAME: &str = "Seaport";

/// Canonical cross-chain deployment of Seaport 1.5
pub const CROSS_CHAIN_SEAPORT_V1_5_ADDRESS: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xad, 0xc0, 0x4c, 0x56, 0xbf, 0x30, 0xac, 0x9d, 0x3c,
    0x0a, 0xaf, 0x14, 0xdc,
]);

/// Canonical cross-chain deployment of Seaport 1.6
pub const CROSS_CHAIN_SEAPORT_V1_6_ADDRESS: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x68, 0xf1, 0x16, 0xa8, 0x94, 0x98, 0x4e, 0x2d, 0xb1,
    0x12, 0x3e, 0xb3, 0x95,
]);

/// Conduit key meaning "approve the Seaport contract directly"
pub const NO_CONDUIT: H256 = H256([0u8; 32]);

pub const OPENSEA_CONDUIT_KEY: H256 = H256([
    0x00, 0x00, 0x00, 0x7b, 0x02, 0x23, 0x00, 0x91, 0xa7, 0xed, 0x01, 0x23, 0x00, 0x72, 0xf7, 0x00,
    0x6a, 0x00, 0x4d, 0x60, 0xa8, 0xd4, 0xe7, 0x1d, 0x59, 0x9b, 0x81, 0x04, 0x25, 0x0f, 0x00, 0x00,
]);

pub const OPENSEA_CONDUIT_ADDRESS: Address = H160([
    0x1e, 0x00, 0x49, 0x78, 0x3f, 0x00, 0x8a, 0x00, 0x85, 0x19, 0x3e, 0x00, 0x00, 0x3d, 0x00, 0xcd,
    0x54, 0x00, 0x3c, 0x71,
]);

pub const ONE_HUNDRED_PERCENT_BP: u32 = 10_000;

pub const MAX_INT: U256 = U256::MAX;

/// Default seconds added to the block timestamp when pricing ascending amounts
pub const DEFAULT_ASCENDING_AMOUNT_BUFFER: u64 = 300;

pub const OFFER_ITEM_TYPE: &str =
    "OfferItem(uint8 itemType,address token,uint256 identifierOrCriteria,uint256 startAmount,uint256 endAmount)";

pub const CONSIDERATION_ITEM_TYPE: &str = "ConsiderationItem(uint8 itemType,address token,uint256 identifierOrCriteria,uint256 startAmount,uint256 endAmount,address recipient)";

pub const ORDER_COMPONENTS_PARTIAL_TYPE: &str = "OrderComponents(address offerer,address zone,OfferItem[] offer,ConsiderationItem[] consideration,uint8 orderType,uint256 startTime,uint256 endTime,bytes32 zoneHash,uint256 salt,bytes32 conduitKey,uint256 counter)";

lazy_static! {
    pub static ref OFFER_ITEM_TYPEHASH: H256 = H256(keccak256(OFFER_ITEM_TYPE));
    pub static ref CONSIDERATION_ITEM_TYPEHASH: H256 = H256(keccak256(CONSIDERATION_ITEM_TYPE));
    // Referenced struct types are appended in alphabetical order.
    pub static ref ORDER_COMPONENTS_TYPEHASH: H256 = H256(keccak256(format!(
        "{ORDER_COMPONENTS_PARTIAL_TYPE}{CONSIDERATION_ITEM_TYPE}{OFFER_ITEM_TYPE}"
    )));
}
