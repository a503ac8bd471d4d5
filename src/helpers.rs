use chrono::Utc;
use ethers::{
    types::{U256, U512},
    utils::keccak256,
};

/// Current wall-clock time as a unix timestamp in seconds
pub fn current_timestamp() -> U256 {
    U256::from(Utc::now().timestamp().max(0) as u64)
}

/// Four-byte keccak prefix marketplaces use to tag salts and calldata
pub fn domain_tag(domain: &str) -> [u8; 4] {
    let hash = keccak256(domain.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Random order salt. When a domain tag is given the first four bytes carry
/// the tag's keccak prefix so marketplaces can attribute orders.
pub fn generate_random_salt(domain: Option<&str>) -> U256 {
    let mut salt: [u8; 32] = rand::random();
    if let Some(domain) = domain {
        salt[..4].copy_from_slice(&domain_tag(domain));
    }
    U256::from_big_endian(&salt)
}

pub fn gcd(a: U256, b: U256) -> U256 {
    let (mut a, mut b) = (a, b);
    while !b.is_zero() {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// `amount * numerator / denominator` without intermediate overflow
pub fn mul_div(amount: U256, numerator: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::zero();
    }
    let product = amount.full_mul(numerator) / U512::from(denominator);
    U256::try_from(product).unwrap_or(U256::MAX)
}

/// Decimal-string (de)serialization for amounts, matching the JSON shape
/// orders are exchanged in. Hex strings are accepted on input.
pub mod serde_u256 {
    use ethers::types::U256;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &U256, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> std::result::Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        match raw.strip_prefix("0x") {
            Some(hex) => U256::from_str_radix(hex, 16).map_err(D::Error::custom),
            None => U256::from_dec_str(&raw).map_err(D::Error::custom),
        }
    }
}

/// [`serde_u256`] for optional amounts. Absent and `null` both read as `None`.
pub mod serde_opt_u256 {
    use ethers::types::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<U256>, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serde_u256::serialize(value, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> std::result::Result<Option<U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Amount(#[serde(with = "super::serde_u256")] U256);

        Ok(Option::<Amount>::deserialize(d)?.map(|Amount(value)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_carries_domain_prefix() {
        let salt = generate_random_salt(Some("opensea.io"));
        let mut bytes = [0u8; 32];
        salt.to_big_endian(&mut bytes);
        assert_eq!(bytes[..4], keccak256("opensea.io")[..4]);
    }

    #[test]
    fn gcd_and_mul_div() {
        assert_eq!(gcd(U256::from(12), U256::from(18)), U256::from(6));
        assert_eq!(gcd(U256::from(7), U256::zero()), U256::from(7));
        assert_eq!(
            mul_div(U256::MAX, U256::from(2), U256::from(4)),
            U256::MAX / 2
        );
        assert_eq!(mul_div(U256::from(5), U256::from(1), U256::zero()), U256::zero());
    }

    #[test]
    fn u256_strings() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper(#[serde(with = "serde_u256")] U256);

        let json = serde_json::to_string(&Wrapper(U256::from(1000))).unwrap();
        assert_eq!(json, "\"1000\"");
        let parsed: Wrapper = serde_json::from_str("\"0x10\"").unwrap();
        assert_eq!(parsed.0, U256::from(16));
    }

    #[test]
    fn optional_u256_strings() {
        #[derive(serde::Serialize, serde::Deserialize, Default)]
        struct Wrapper {
            #[serde(default, with = "serde_opt_u256")]
            amount: Option<U256>,
        }

        let json = serde_json::to_string(&Wrapper { amount: Some(U256::from(25)) }).unwrap();
        assert_eq!(json, r#"{"amount":"25"}"#);
        let parsed: Wrapper = serde_json::from_str(r#"{"amount":"1000"}"#).unwrap();
        assert_eq!(parsed.amount, Some(U256::from(1000)));
        let parsed: Wrapper = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.amount, None);
        let parsed: Wrapper = serde_json::from_str(r#"{"amount":null}"#).unwrap();
        assert_eq!(parsed.amount, None);
    }
}
