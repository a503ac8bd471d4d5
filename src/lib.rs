#![deny(unreachable_pub)]
pub mod abi;
pub mod config;
pub mod consts;
pub mod eip712;
pub mod errors;
pub mod exchange;
pub mod helpers;
pub mod info;
pub mod prelude;
pub mod signature;

// Re-exports for convenience
pub use config::{SeaportConfig, SeaportVersion};
pub use errors::Error;
pub use exchange::{
    dtos::{
        ConsiderationInputItem, CreateInputItem, CreateOrderInput, Fee, FulfillOrderInput,
        TipInputItem, TransactionOverrides,
    },
    exchange_client::{CreateOrderUseCase, Seaport},
    fulfill::FulfillOrderUseCase,
    order::{
        ConsiderationItem, ItemType, OfferItem, OrderComponents, OrderParameters, OrderStatus,
        OrderType, OrderWithCounter,
    },
};
