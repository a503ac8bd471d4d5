use std::collections::BTreeMap;

use ethers::{
    abi::{encode, Token},
    types::{
        transaction::eip712::{EIP712Domain, Eip712DomainType, TypedData},
        H256,
    },
    utils::keccak256,
};

use crate::{
    consts::{CONSIDERATION_ITEM_TYPEHASH, OFFER_ITEM_TYPEHASH, ORDER_COMPONENTS_TYPEHASH},
    exchange::order::{ConsiderationItem, OfferItem, OrderComponents},
    prelude::*,
    Error,
};

pub trait Eip712 {
    fn struct_hash(&self) -> H256;

    fn eip712_signing_hash(&self, domain: &EIP712Domain) -> H256 {
        let mut digest_input = [0u8; 2 + 32 + 32];
        digest_input[0] = 0x19;
        digest_input[1] = 0x01;
        digest_input[2..34].copy_from_slice(&domain.separator());
        digest_input[34..66].copy_from_slice(self.struct_hash().as_bytes());
        H256(keccak256(digest_input))
    }
}

fn hash_tokens(tokens: &[Token]) -> H256 {
    H256(keccak256(encode(tokens)))
}

fn hash_array<T: Eip712>(items: &[T]) -> H256 {
    let concatenated: Vec<u8> = items
        .iter()
        .flat_map(|item| item.struct_hash().to_fixed_bytes())
        .collect();
    H256(keccak256(concatenated))
}

impl Eip712 for OfferItem {
    fn struct_hash(&self) -> H256 {
        hash_tokens(&[
            Token::FixedBytes(OFFER_ITEM_TYPEHASH.as_bytes().to_vec()),
            Token::Uint(u8::from(self.item_type).into()),
            Token::Address(self.token),
            Token::Uint(self.identifier_or_criteria),
            Token::Uint(self.start_amount),
            Token::Uint(self.end_amount),
        ])
    }
}

impl Eip712 for ConsiderationItem {
    fn struct_hash(&self) -> H256 {
        hash_tokens(&[
            Token::FixedBytes(CONSIDERATION_ITEM_TYPEHASH.as_bytes().to_vec()),
            Token::Uint(u8::from(self.item_type).into()),
            Token::Address(self.token),
            Token::Uint(self.identifier_or_criteria),
            Token::Uint(self.start_amount),
            Token::Uint(self.end_amount),
            Token::Address(self.recipient),
        ])
    }
}

impl Eip712 for OrderComponents {
    /// This is the order hash the contract keys order status by
    fn struct_hash(&self) -> H256 {
        hash_tokens(&[
            Token::FixedBytes(ORDER_COMPONENTS_TYPEHASH.as_bytes().to_vec()),
            Token::Address(self.offerer),
            Token::Address(self.zone),
            Token::FixedBytes(hash_array(&self.offer).as_bytes().to_vec()),
            Token::FixedBytes(hash_array(&self.consideration).as_bytes().to_vec()),
            Token::Uint(u8::from(self.order_type).into()),
            Token::Uint(self.start_time),
            Token::Uint(self.end_time),
            Token::FixedBytes(self.zone_hash.as_bytes().to_vec()),
            Token::Uint(self.salt),
            Token::FixedBytes(self.conduit_key.as_bytes().to_vec()),
            Token::Uint(self.counter),
        ])
    }
}

fn field(name: &str, ty: &str) -> Eip712DomainType {
    Eip712DomainType {
        name: name.to_string(),
        r#type: ty.to_string(),
    }
}

fn order_types() -> BTreeMap<String, Vec<Eip712DomainType>> {
    let item_fields = || {
        vec![
            field("itemType", "uint8"),
            field("token", "address"),
            field("identifierOrCriteria", "uint256"),
            field("startAmount", "uint256"),
            field("endAmount", "uint256"),
        ]
    };
    let mut consideration_fields = item_fields();
    consideration_fields.push(field("recipient", "address"));

    BTreeMap::from([
        (
            "EIP712Domain".to_string(),
            vec![
                field("name", "string"),
                field("version", "string"),
                field("chainId", "uint256"),
                field("verifyingContract", "address"),
            ],
        ),
        (
            "OrderComponents".to_string(),
            vec![
                field("offerer", "address"),
                field("zone", "address"),
                field("offer", "OfferItem[]"),
                field("consideration", "ConsiderationItem[]"),
                field("orderType", "uint8"),
                field("startTime", "uint256"),
                field("endTime", "uint256"),
                field("zoneHash", "bytes32"),
                field("salt", "uint256"),
                field("conduitKey", "bytes32"),
                field("counter", "uint256"),
            ],
        ),
        ("OfferItem".to_string(), item_fields()),
        ("ConsiderationItem".to_string(), consideration_fields),
    ])
}

/// Typed-data payload in the `eth_signTypedData_v4` shape, for wallets and
/// nodes that sign on the caller's behalf
pub fn order_typed_data(domain: &EIP712Domain, components: &OrderComponents) -> Result<TypedData> {
    let message = match serde_json::to_value(components) {
        Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
        Ok(other) => return Err(Error::JsonParse(format!("unexpected order shape {other}"))),
        Err(e) => return Err(Error::JsonParse(e.to_string())),
    };

    Ok(TypedData {
        domain: domain.clone(),
        types: order_types(),
        primary_type: "OrderComponents".to_string(),
        message,
    })
}
