use ethers::types::{H256, U256};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Contract interaction failed: {0}")]
    ContractInteraction(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Transaction {0:#x} reverted")]
    TransactionReverted(H256),
    #[error("Transaction was dropped before confirmation")]
    TxDropped,
    #[error("Failed to sign order: {0}")]
    SignatureFailure(String),
    #[error("Json parse error: {0}")]
    JsonParse(String),
    #[error("No account address was given and the provider has no default sender")]
    MissingAccount,
    #[error("No conduit is known for conduit key {0:#x}")]
    UnknownConduit(H256),
    #[error("All currency tokens in the order must be the same token")]
    MixedCurrencies,
    #[error("Total fee basis points {0} exceed 100%")]
    FeesExceedTotal(u32),
    #[error("The offerer does not have the amount needed to create or fulfill.")]
    InsufficientOffererBalance,
    #[error("The offerer does not have the sufficient approvals.")]
    InsufficientOffererApprovals,
    #[error("The fulfiller does not have the balances needed to fulfill.")]
    InsufficientFulfillerBalance,
    #[error("The order you are trying to fulfill is cancelled")]
    OrderCancelled,
    #[error("The order you are trying to fulfill is already filled")]
    OrderAlreadyFilled,
    #[error("The order you are trying to fulfill is not currently active")]
    OrderInactive,
    #[error("Units to fill must be positive and the order must allow partial fills")]
    InvalidUnitsToFill,
    #[error("Summed item amounts overflow 256 bits")]
    AmountOverflow,
    #[error("Fill fraction {0}/{1} does not fit in 120 bits")]
    FractionOverflow(U256, U256),
    #[error("Unknown item type {0}")]
    UnknownItemType(u8),
    #[error("Unknown order type {0}")]
    UnknownOrderType(u8),
}
