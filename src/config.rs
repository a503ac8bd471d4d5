use std::collections::HashMap;

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::{
    consts::{
        CROSS_CHAIN_SEAPORT_V1_5_ADDRESS, CROSS_CHAIN_SEAPORT_V1_6_ADDRESS,
        DEFAULT_ASCENDING_AMOUNT_BUFFER, NO_CONDUIT,
    },
    prelude::*,
    Error,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeaportVersion {
    #[default]
    #[serde(rename = "1.5")]
    V1_5,
    #[serde(rename = "1.6")]
    V1_6,
}

impl SeaportVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeaportVersion::V1_5 => "1.5",
            SeaportVersion::V1_6 => "1.6",
        }
    }

    pub fn canonical_address(&self) -> Address {
        match self {
            SeaportVersion::V1_5 => CROSS_CHAIN_SEAPORT_V1_5_ADDRESS,
            SeaportVersion::V1_6 => CROSS_CHAIN_SEAPORT_V1_6_ADDRESS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeaportConfig {
    pub seaport_version: SeaportVersion,
    /// Custom deployment, e.g. on a local devnet
    pub contract_address: Option<Address>,
    /// Extra conduits on top of the built-in ones
    pub conduit_key_to_conduit: HashMap<H256, Address>,
    pub default_conduit_key: H256,
    /// Seconds
    pub ascending_amount_fulfillment_buffer: u64,
    pub balance_and_approval_checks_on_order_creation: bool,
}

impl Default for SeaportConfig {
    fn default() -> Self {
        Self {
            seaport_version: SeaportVersion::default(),
            contract_address: None,
            conduit_key_to_conduit: HashMap::new(),
            default_conduit_key: NO_CONDUIT,
            ascending_amount_fulfillment_buffer: DEFAULT_ASCENDING_AMOUNT_BUFFER,
            balance_and_approval_checks_on_order_creation: true,
        }
    }
}

impl SeaportConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::JsonParse(e.to_string()))
    }

    pub fn seaport_address(&self) -> Address {
        self.contract_address
            .unwrap_or_else(|| self.seaport_version.canonical_address())
    }
}
