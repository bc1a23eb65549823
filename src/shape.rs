//! Per-method shaping of response results.
//!
//! Every method in the method tables names one of the shapers in this module.
//! A shaper rewrites the `result` of a response without a protocol error and
//! decides whether the call counts as a success.

use crate::{
    normalize::{Error, Normalizer},
    types::{BlockSpec, Hydrated},
};
use ethprim::{Digest, U256};
use serde_json::{Map, Value};

/// The outcome of shaping a result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Success,
    /// The node answered, but the result means the call did not succeed.
    Rejected(&'static str),
}

/// Message for receipt lookups of transactions that have not been mined.
pub const PENDING_TRANSACTION: &str = "transaction is pending";

const BLOCK_BY_HASH_QUANTITIES: &[&str] = &[
    "difficulty",
    "number",
    "timestamp",
    "gasLimit",
    "gasUsed",
    "size",
];
const BLOCK_BY_NUMBER_QUANTITIES: &[&str] = &["number", "timestamp", "gasLimit", "gasUsed"];
const BLOCK_TRANSACTION_QUANTITIES: &[&str] = &["nonce", "gas", "transactionIndex"];
const TRANSACTION_QUANTITIES: &[&str] = &["gas", "blockNumber", "nonce", "transactionIndex"];
const TRANSACTION_WEI: &[&str] = &["gasPrice", "value"];
const RECEIPT_QUANTITIES: &[&str] = &[
    "blockNumber",
    "gasUsed",
    "cumulativeGasUsed",
    "status",
    "transactionIndex",
];
const LOG_QUANTITIES: &[&str] = &["logIndex", "transactionIndex", "blockNumber"];

/// Leaves the result untouched.
pub fn passthrough<P>(_: &P, _: &Normalizer, _: &mut Value) -> Result<Verdict, Error> {
    Ok(Verdict::Success)
}

/// The result is a single hex quantity.
pub fn quantity<P>(_: &P, normalizer: &Normalizer, result: &mut Value) -> Result<Verdict, Error> {
    normalizer.quantity("result", result)?;
    Ok(Verdict::Success)
}

/// The result is a single amount in wei.
pub fn wei<P>(_: &P, normalizer: &Normalizer, result: &mut Value) -> Result<Verdict, Error> {
    normalizer.wei("result", result)?;
    Ok(Verdict::Success)
}

/// A block requested with full transaction objects.
pub fn block_by_hash(
    _: &(Digest,),
    normalizer: &Normalizer,
    result: &mut Value,
) -> Result<Verdict, Error> {
    let Some(block) = result.as_object_mut() else {
        return Ok(Verdict::Success);
    };

    normalizer.quantities(block, BLOCK_BY_HASH_QUANTITIES)?;
    for transaction in transactions(block) {
        normalizer.quantities(transaction, BLOCK_TRANSACTION_QUANTITIES)?;
        normalizer.wei_fields(transaction, TRANSACTION_WEI)?;
    }
    Ok(Verdict::Success)
}

/// A block where transactions are only objects when hydrated.
pub fn block_by_number(
    (_, hydrated): &(BlockSpec, Hydrated),
    normalizer: &Normalizer,
    result: &mut Value,
) -> Result<Verdict, Error> {
    let Some(block) = result.as_object_mut() else {
        return Ok(Verdict::Success);
    };

    normalizer.quantities(block, BLOCK_BY_NUMBER_QUANTITIES)?;
    if hydrated.as_bool() {
        for transaction in transactions(block) {
            normalizer.quantities(transaction, TRANSACTION_QUANTITIES)?;
            normalizer.wei_fields(transaction, TRANSACTION_WEI)?;
        }
    }
    Ok(Verdict::Success)
}

/// A single transaction object, or `null` when not found.
pub fn transaction<P>(
    _: &P,
    normalizer: &Normalizer,
    result: &mut Value,
) -> Result<Verdict, Error> {
    if let Some(transaction) = result.as_object_mut() {
        normalizer.quantities(transaction, TRANSACTION_QUANTITIES)?;
        normalizer.wei_fields(transaction, TRANSACTION_WEI)?;
    }
    Ok(Verdict::Success)
}

/// A transaction receipt. An empty result means the transaction has not been
/// mined yet, which is rejected.
pub fn receipt<P>(_: &P, normalizer: &Normalizer, result: &mut Value) -> Result<Verdict, Error> {
    if is_empty(result) {
        return Ok(Verdict::Rejected(PENDING_TRANSACTION));
    }
    let Some(receipt) = result.as_object_mut() else {
        return Ok(Verdict::Success);
    };

    normalizer.quantities(receipt, RECEIPT_QUANTITIES)?;
    if let Some(Value::Array(logs)) = receipt.get_mut("logs") {
        for log in logs.iter_mut().filter_map(Value::as_object_mut) {
            log_entry(normalizer, log)?;
        }
    }
    Ok(Verdict::Success)
}

/// Normalizes a log entry of a receipt.
///
/// Positional fields become decimal. Log data small enough to be a single
/// numeric value becomes a decimal string. For logs with exactly three topics,
/// the indexed topics are taken to be padded addresses and stripped down to
/// their last 20 bytes.
pub fn log_entry(normalizer: &Normalizer, log: &mut Map<String, Value>) -> Result<(), Error> {
    normalizer.quantities(log, LOG_QUANTITIES)?;

    if let Some(data) = log.get_mut("data") {
        if let Some(decimal) = data.as_str().and_then(small_number) {
            *data = Value::String(decimal);
        }
    }

    if let Some(Value::Array(topics)) = log.get_mut("topics") {
        if topics.len() == 3 {
            for topic in &mut topics[1..] {
                if let Some(address) = topic.as_str().and_then(address_topic) {
                    *topic = Value::String(address);
                }
            }
        }
    }
    Ok(())
}

fn transactions(
    block: &mut Map<String, Value>,
) -> impl Iterator<Item = &mut Map<String, Value>> + '_ {
    block
        .get_mut("transactions")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn is_empty(result: &Value) -> bool {
    match result {
        Value::Null => true,
        Value::Bool(value) => !value,
        Value::String(value) => value.is_empty(),
        Value::Array(value) => value.is_empty(),
        Value::Object(value) => value.is_empty(),
        Value::Number(_) => false,
    }
}

/// Log data of at most one word whose value has no more than 30 decimal
/// digits.
fn small_number(data: &str) -> Option<String> {
    if data.len() > 66 {
        return None;
    }
    let digits = data.strip_prefix("0x")?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let value = if digits.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(digits, 16).ok()?
    };
    let decimal = value.to_string();
    (decimal.len() <= 30).then_some(decimal)
}

fn address_topic(topic: &str) -> Option<String> {
    let digits = topic.strip_prefix("0x")?;
    if digits.len() < 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{}", &digits[digits.len() - 40..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize::EtherFormat, types::BlockTag};
    use hex_literal::hex;
    use serde_json::json;

    fn hash() -> Digest {
        Digest::from_slice(&hex!(
            "b903239f8543d04b5dc1ba6579132b143087c68db1b2168786408fcbce568238"
        ))
    }

    #[test]
    fn single_values() {
        let normalizer = Normalizer::default();

        let mut result = json!("0x10");
        assert_eq!(
            quantity(&(), &normalizer, &mut result).unwrap(),
            Verdict::Success
        );
        assert_eq!(result, json!("16"));

        let mut result = json!("0xde0b6b3a7640000");
        assert_eq!(wei(&(), &normalizer, &mut result).unwrap(), Verdict::Success);
        assert_eq!(result, json!(1.0));

        let mut result = json!("0xdeadbeef");
        assert_eq!(
            passthrough(&(), &normalizer, &mut result).unwrap(),
            Verdict::Success
        );
        assert_eq!(result, json!("0xdeadbeef"));
    }

    #[test]
    fn hydrated_block_by_hash() {
        let mut result = json!({
            "hash": "0xb903239f8543d04b5dc1ba6579132b143087c68db1b2168786408fcbce568238",
            "difficulty": "0x4ea3f27bc",
            "number": "0x1b4",
            "timestamp": "0x55ba467c",
            "gasLimit": "0x1388",
            "gasUsed": "0x0",
            "size": "0x220",
            "transactions": [{
                "hash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
                "blockNumber": "0x1b4",
                "nonce": "0x15",
                "gas": "0xc350",
                "gasPrice": "0x4a817c800",
                "transactionIndex": "0x41",
                "value": "0xde0b6b3a7640000",
            }],
        });
        block_by_hash(&(hash(),), &Normalizer::default(), &mut result).unwrap();

        assert_eq!(
            result,
            json!({
                "hash": "0xb903239f8543d04b5dc1ba6579132b143087c68db1b2168786408fcbce568238",
                "difficulty": "21109876668",
                "number": "436",
                "timestamp": "1438271100",
                "gasLimit": "5000",
                "gasUsed": "0",
                "size": "544",
                "transactions": [{
                    "hash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
                    "blockNumber": "0x1b4",
                    "nonce": "21",
                    "gas": "50000",
                    "gasPrice": 2e-8,
                    "transactionIndex": "65",
                    "value": 1.0,
                }],
            }),
        );
    }

    #[test]
    fn block_by_number_only_normalizes_hydrated_transactions() {
        let normalizer = Normalizer::default();
        let block = json!({
            "number": "0x1b4",
            "timestamp": "0x55ba467c",
            "gasLimit": "0x1388",
            "gasUsed": "0x5208",
            "difficulty": "0x4ea3f27bc",
            "transactions": [{
                "blockNumber": "0x1b4",
                "transactionIndex": "0x0",
                "nonce": "0x1",
                "gas": "0x5208",
                "gasPrice": "0x0",
                "value": "0x0",
            }],
        });

        let mut result = block.clone();
        block_by_number(
            &(BlockSpec::Tag(BlockTag::Latest), Hydrated::Yes),
            &normalizer,
            &mut result,
        )
        .unwrap();
        assert_eq!(
            result,
            json!({
                "number": "436",
                "timestamp": "1438271100",
                "gasLimit": "5000",
                "gasUsed": "21000",
                "difficulty": "0x4ea3f27bc",
                "transactions": [{
                    "blockNumber": "436",
                    "transactionIndex": "0",
                    "nonce": "1",
                    "gas": "21000",
                    "gasPrice": 0.0,
                    "value": 0.0,
                }],
            }),
        );

        let mut result = block.clone();
        block_by_number(
            &(BlockSpec::Tag(BlockTag::Latest), Hydrated::No),
            &normalizer,
            &mut result,
        )
        .unwrap();
        assert_eq!(result["number"], json!("436"));
        assert_eq!(result["transactions"], block["transactions"]);
    }

    #[test]
    fn transaction_hashes_in_blocks_are_untouched() {
        let mut result = json!({
            "number": "0x1",
            "transactions": [
                "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            ],
        });
        block_by_number(
            &(BlockSpec::default(), Hydrated::Yes),
            &Normalizer::default(),
            &mut result,
        )
        .unwrap();
        assert_eq!(
            result["transactions"],
            json!(["0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"]),
        );
    }

    #[test]
    fn missing_blocks_and_transactions() {
        let normalizer = Normalizer::default();

        let mut result = Value::Null;
        assert_eq!(
            block_by_hash(&(hash(),), &normalizer, &mut result).unwrap(),
            Verdict::Success
        );
        assert_eq!(
            transaction(&(hash(),), &normalizer, &mut result).unwrap(),
            Verdict::Success
        );
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn transaction_in_exact_ether() {
        let mut result = json!({
            "blockNumber": null,
            "gas": "0x5208",
            "gasPrice": "0x3b9aca00",
            "nonce": "0x0",
            "transactionIndex": null,
            "value": "0x6f05b59d3b20000",
        });
        transaction(
            &(hash(),),
            &Normalizer::new(EtherFormat::Exact),
            &mut result,
        )
        .unwrap();

        assert_eq!(
            result,
            json!({
                "blockNumber": null,
                "gas": "21000",
                "gasPrice": "0.000000001",
                "nonce": "0",
                "transactionIndex": null,
                "value": "0.5",
            }),
        );
    }

    #[test]
    fn receipt_with_logs() {
        let mut result = json!({
            "blockNumber": "0xb",
            "gasUsed": "0x4dc",
            "cumulativeGasUsed": "0x33bc",
            "status": "0x1",
            "transactionIndex": "0x1",
            "contractAddress": null,
            "logs": [{
                "logIndex": "0x1",
                "transactionIndex": "0x0",
                "blockNumber": "0x1b4",
                "data": "0x00000000000000000000000000000000000000000000000000000000000003e8",
                "topics": [
                    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                    "0x0000000000000000000000009008d19f58aabd9ed0d60971565aa8510560ab41",
                    "0x000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                ],
            }],
        });
        let verdict = receipt(&(hash(),), &Normalizer::default(), &mut result).unwrap();

        assert_eq!(verdict, Verdict::Success);
        assert_eq!(
            result,
            json!({
                "blockNumber": "11",
                "gasUsed": "1244",
                "cumulativeGasUsed": "13244",
                "status": "1",
                "transactionIndex": "1",
                "contractAddress": null,
                "logs": [{
                    "logIndex": "1",
                    "transactionIndex": "0",
                    "blockNumber": "436",
                    "data": "1000",
                    "topics": [
                        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                        "0x9008d19f58aabd9ed0d60971565aa8510560ab41",
                        "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                    ],
                }],
            }),
        );
    }

    #[test]
    fn large_log_data_and_other_topic_counts_are_untouched() {
        let data = "0x000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000000000ff";
        let topics = json!([
            "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925",
            "0x0000000000000000000000009008d19f58aabd9ed0d60971565aa8510560ab41",
        ]);
        let mut result = json!({
            "status": "0x0",
            "logs": [
                { "data": data, "topics": topics },
                { "data": "0xffffffffffffffffffffffffffffffffffffffff" },
                { "data": "0x" },
            ],
        });
        receipt(&(hash(),), &Normalizer::default(), &mut result).unwrap();

        assert_eq!(result["status"], json!("0"));
        assert_eq!(result["logs"][0], json!({ "data": data, "topics": topics }));
        assert_eq!(
            result["logs"][1]["data"],
            json!("0xffffffffffffffffffffffffffffffffffffffff"),
        );
        assert_eq!(result["logs"][2]["data"], json!("0"));
    }

    #[test]
    fn short_log_data_becomes_decimal() {
        let mut log = json!({
            "data": "0x00000000000000000000000000000000000000000000000000000000000001",
            "topics": [],
        });
        log_entry(&Normalizer::default(), log.as_object_mut().unwrap()).unwrap();
        assert_eq!(log, json!({ "data": "1", "topics": [] }));
    }

    #[test]
    fn pending_receipts_are_rejected() {
        for mut result in [
            Value::Null,
            json!({}),
            json!([]),
            json!(""),
            json!(false),
        ] {
            assert_eq!(
                receipt(&(hash(),), &Normalizer::default(), &mut result).unwrap(),
                Verdict::Rejected(PENDING_TRANSACTION),
            );
        }
    }

    #[test]
    fn invalid_receipt_fields() {
        let mut result = json!({ "gasUsed": 1244 });
        assert!(receipt(&(hash(),), &Normalizer::default(), &mut result).is_err());
    }
}
