//! Serde helpers writing chain integers as decimal strings. JSON numbers lose precision past
//! 2^53 in most consumers, token ids and wei balances do not fit.

use ethers::types::U256;
use serde::{de, Deserialize, Deserializer, Serializer};

/// Older snapshots wrote small integers as plain JSON numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalValue {
    Number(u64),
    Negative(i64),
    Text(String),
}

fn negative<E: de::Error, T>(num: i64) -> Result<T, E> {
    Err(de::Error::invalid_value(
        de::Unexpected::Signed(num),
        &"a non-negative integer",
    ))
}

fn parse_u256<E: de::Error>(s: &str) -> Result<U256, E> {
    if s.trim().is_empty() {
        return Err(de::Error::invalid_value(
            de::Unexpected::Str(s),
            &"a non-empty base-10 integer string",
        ));
    }
    U256::from_dec_str(s.trim()).map_err(|error| {
        de::Error::invalid_value(
            de::Unexpected::Str(&format!("unexpected value: {}, error: {}", s, error)),
            &"a base-10 integer as string e.g. \"118908973575220938641041929\"",
        )
    })
}

pub fn from_u256_string<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match DecimalValue::deserialize(deserializer)? {
        DecimalValue::Number(num) => Ok(U256::from(num)),
        DecimalValue::Negative(num) => negative(num),
        DecimalValue::Text(s) => parse_u256(&s),
    }
}

/// Like [`from_u256_string`] but an empty string reads as zero, explorers report unknown
/// balances that way. A well-formed negative balance also reads as zero so the zero-balance
/// filters drop it, malformed text is still an error.
pub fn from_balance_string<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match DecimalValue::deserialize(deserializer)? {
        DecimalValue::Number(num) => Ok(U256::from(num)),
        DecimalValue::Negative(_) => Ok(U256::zero()),
        DecimalValue::Text(s) if s.trim().is_empty() => Ok(U256::zero()),
        DecimalValue::Text(s) => match s.trim().strip_prefix('-') {
            Some(digits) => parse_u256::<D::Error>(digits).map(|_| U256::zero()),
            None => parse_u256(&s),
        },
    }
}

pub fn to_u256_string<S>(num: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&num.to_string())
}

pub fn from_u64_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match DecimalValue::deserialize(deserializer)? {
        DecimalValue::Number(num) => Ok(num),
        DecimalValue::Negative(num) => negative(num),
        DecimalValue::Text(s) => s.trim().parse::<u64>().map_err(|error| {
            de::Error::invalid_value(
                de::Unexpected::Str(&format!("unexpected value: {}, error: {}", s, error)),
                &"a number as string e.g. \"7461153\", which fits within u64",
            )
        }),
    }
}

pub fn to_u64_string<S>(num: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&num.to_string())
}
