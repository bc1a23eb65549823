//! Conversion of hex encoded node values into decimal form.
//!
//! Nodes encode every numeric value as a `0x` prefixed hex string. The
//! [`Normalizer`] rewrites such values to decimal strings, and amounts
//! denominated in wei to ether.

use ethprim::U256;
use serde_json::{Map, Value};
use thiserror::Error;

/// The number of wei in one ether.
pub const WEI_PER_ETHER: U256 = U256::new(1_000_000_000_000_000_000);

/// How wei amounts get rendered once converted to ether.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EtherFormat {
    /// A JSON number. Amounts that don't fit an `f64` lose precision.
    #[default]
    Float,
    /// A decimal string with as many fractional digits as needed.
    Exact,
}

/// An error normalizing a response field.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("field `{field}` is not a hex quantity: {value}")]
    InvalidQuantity { field: String, value: Value },
}

/// Parses a `0x` prefixed hex quantity.
pub fn parse_quantity(value: &str) -> Option<U256> {
    let digits = value.strip_prefix("0x")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    U256::from_str_radix(digits, 16).ok()
}

/// Formats a wei amount as an exact decimal ether string.
pub fn format_ether(wei: U256) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;
    if fraction == U256::ZERO {
        return whole.to_string();
    }

    let fraction = format!("{:0>18}", fraction.to_string());
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

/// Converts a wei amount to ether as a floating point number.
pub fn wei_to_ether(wei: U256) -> f64 {
    // Parsing the exact decimal ether amount rounds only once.
    format_ether(wei).parse::<f64>().unwrap_or(f64::NAN)
}

/// Applies quantity and wei conversions to response values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Normalizer {
    ether: EtherFormat,
}

impl Normalizer {
    pub fn new(ether: EtherFormat) -> Self {
        Self { ether }
    }

    pub fn ether_format(&self) -> EtherFormat {
        self.ether
    }

    /// Rewrites a hex quantity into a decimal string. `null` is left as is.
    pub fn quantity(&self, field: &str, value: &mut Value) -> Result<(), Error> {
        if let Some(quantity) = decode(field, value)? {
            *value = Value::String(quantity.to_string());
        }
        Ok(())
    }

    /// Rewrites a hex wei amount into ether. `null` is left as is.
    pub fn wei(&self, field: &str, value: &mut Value) -> Result<(), Error> {
        if let Some(wei) = decode(field, value)? {
            *value = match self.ether {
                EtherFormat::Float => Value::from(wei_to_ether(wei)),
                EtherFormat::Exact => Value::String(format_ether(wei)),
            };
        }
        Ok(())
    }

    /// Applies [`Normalizer::quantity`] to each of the named fields present in
    /// an object.
    pub fn quantities(&self, object: &mut Map<String, Value>, fields: &[&str]) -> Result<(), Error> {
        for field in fields {
            if let Some(value) = object.get_mut(*field) {
                self.quantity(field, value)?;
            }
        }
        Ok(())
    }

    /// Applies [`Normalizer::wei`] to each of the named fields present in an
    /// object.
    pub fn wei_fields(&self, object: &mut Map<String, Value>, fields: &[&str]) -> Result<(), Error> {
        for field in fields {
            if let Some(value) = object.get_mut(*field) {
                self.wei(field, value)?;
            }
        }
        Ok(())
    }
}

fn decode(field: &str, value: &Value) -> Result<Option<U256>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(hex) => parse_quantity(hex).map(Some).ok_or_else(|| invalid(field, value)),
        _ => Err(invalid(field, value)),
    }
}

fn invalid(field: &str, value: &Value) -> Error {
    Error::InvalidQuantity {
        field: field.to_owned(),
        value: value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::num::Num as _;
    use serde_json::json;

    #[test]
    fn parses_quantities() {
        assert_eq!(parse_quantity("0x0"), Some(U256::ZERO));
        assert_eq!(parse_quantity("0x10"), Some(U256::new(16)));
        assert_eq!(parse_quantity("0xDE0B6B3A7640000"), Some(WEI_PER_ETHER));
        assert_eq!(parse_quantity(&format!("{:#x}", U256::MAX)), Some(U256::MAX));

        assert_eq!(parse_quantity("0x"), None);
        assert_eq!(parse_quantity("10"), None);
        assert_eq!(parse_quantity("0x+1"), None);
        assert_eq!(parse_quantity("0xg"), None);
        assert_eq!(parse_quantity(&format!("{:#x}0", U256::MAX)), None);
    }

    #[test]
    fn quantities() {
        let normalizer = Normalizer::default();
        for (hex, decimal) in [
            ("0x0", "0"),
            ("0x10", "16"),
            ("0x5208", "21000"),
            ("0x12a05f200", "5000000000"),
        ] {
            let mut value = json!(hex);
            normalizer.quantity("result", &mut value).unwrap();
            assert_eq!(value, json!(decimal));
        }

        let mut value = Value::Null;
        normalizer.quantity("result", &mut value).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn quantities_survive_hex_encoding() {
        let normalizer = Normalizer::default();
        for quantity in [
            U256::ZERO,
            U256::ONE,
            U256::new(u64::MAX as u128 + 1),
            U256::from_words(0xffff, 0),
            U256::MAX,
        ] {
            let mut value = json!(quantity.to_hex());
            normalizer.quantity("result", &mut value).unwrap();
            assert_eq!(value, json!(quantity.to_string()));
        }
    }

    #[test]
    fn invalid_quantities() {
        let normalizer = Normalizer::default();
        for value in [json!("16"), json!("0x"), json!(16), json!({}), json!(true)] {
            let mut field = value.clone();
            assert_eq!(
                normalizer.quantity("gasUsed", &mut field),
                Err(Error::InvalidQuantity {
                    field: "gasUsed".to_owned(),
                    value,
                }),
            );
        }
    }

    #[test]
    fn wei_as_float() {
        let normalizer = Normalizer::default();
        for (hex, ether) in [
            ("0x0", 0.0),
            ("0xde0b6b3a7640000", 1.0),
            ("0x6f05b59d3b20000", 0.5),
            ("0x4563918244f40000", 5.0),
            ("0x1", 1e-18),
        ] {
            let mut value = json!(hex);
            normalizer.wei("result", &mut value).unwrap();
            assert_eq!(value, json!(ether));
        }
    }

    #[test]
    fn large_wei_amounts_round_once() {
        let wei = U256::new(470_821_095_229_316_771_675_776_560);
        assert_eq!(format_ether(wei), "470821095.22931677167577656");
        assert_eq!(
            wei_to_ether(wei),
            "470821095.22931677167577656".parse::<f64>().unwrap(),
        );
        assert_eq!(wei_to_ether(wei), 470821095.2293168);
    }

    #[test]
    fn wei_as_exact_string() {
        let normalizer = Normalizer::new(EtherFormat::Exact);
        for (hex, ether) in [
            ("0x0", "0"),
            ("0xde0b6b3a7640000", "1"),
            ("0x6f05b59d3b20000", "0.5"),
            ("0x1", "0.000000000000000001"),
            ("0x1bc16d674ec80001", "2.000000000000000001"),
        ] {
            let mut value = json!(hex);
            normalizer.wei("result", &mut value).unwrap();
            assert_eq!(value, json!(ether));
        }
    }

    #[test]
    fn formats_large_ether_amounts() {
        assert_eq!(
            format_ether(U256::MAX),
            "115792089237316195423570985008687907853269984665640564039457.584007913129639935",
        );
    }

    #[test]
    fn named_fields() {
        let normalizer = Normalizer::default();
        let mut object = json!({
            "gas": "0x5208",
            "value": "0xde0b6b3a7640000",
            "blockNumber": null,
            "hash": "0x0123",
        });
        let object = object.as_object_mut().unwrap();

        normalizer
            .quantities(object, &["gas", "blockNumber", "nonce"])
            .unwrap();
        normalizer.wei_fields(object, &["value", "gasPrice"]).unwrap();

        assert_eq!(
            Value::Object(object.clone()),
            json!({
                "gas": "21000",
                "value": 1.0,
                "blockNumber": null,
                "hash": "0x0123",
            }),
        );
    }
}
