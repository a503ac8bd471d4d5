pub mod actions;
pub mod amounts;
pub mod balance;
pub mod builder;
pub mod cancel;
pub mod exchange_client;
pub mod fulfill;

pub mod dtos;
pub mod order;
