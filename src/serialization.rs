//! JSON serialization helpers.

use serde::{Serialize, Serializer};

/// Serialize an `Option<[u8]>`
pub mod option_bytes {
    use super::{bytes::encode, *};

    #[doc(hidden)]
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        let bytes = match value {
            Some(value) => value.as_ref(),
            None => return serializer.serialize_none(),
        };

        serializer.serialize_some(&encode(bytes))
    }
}

/// Serialize a `[u8]`
pub mod bytes {
    use std::fmt::Write as _;

    #[doc(hidden)]
    pub fn encode(bytes: &[u8]) -> String {
        let mut buffer = String::with_capacity(2 + bytes.len() * 2);
        buffer.push_str("0x");
        for byte in bytes {
            let _ = write!(&mut buffer, "{byte:02x}");
        }
        buffer
    }
}

/// Serialize `0x` prefixed hex numbers.
pub mod num {
    use super::*;
    use ethprim::U256;

    #[doc(hidden)]
    pub trait Num {
        fn to_hex(&self) -> String;
    }

    macro_rules! impl_num {
        ($($t:ty,)*) => {$(
            impl Num for $t {
                fn to_hex(&self) -> String {
                    format!("{self:#x}")
                }
            }
        )*};
    }

    impl_num! {
        u64,
        U256,
    }

    #[doc(hidden)]
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Num,
        S: Serializer,
    {
        value.to_hex().serialize(serializer)
    }
}

/// `eth_getBlockByHash` parameters. Blocks are always requested with full
/// transaction objects.
pub mod params_block_by_hash {
    use super::*;
    use ethprim::Digest;

    #[doc(hidden)]
    pub fn serialize<S>((hash,): &(Digest,), serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (hash, true).serialize(serializer)
    }
}

/// `eth_estimateGas` parameters: a call to the given address with empty
/// calldata.
pub mod params_estimate_gas {
    use super::*;
    use ethprim::Address;

    #[derive(Serialize)]
    struct Call<'a> {
        to: &'a Address,
        data: &'static str,
    }

    #[doc(hidden)]
    pub fn serialize<S>((to,): &(Address,), serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (Call { to, data: "0x" },).serialize(serializer)
    }
}

/// `eth_sign` parameters.
pub mod params_eth_sign {
    use super::*;
    use ethprim::Address;

    #[doc(hidden)]
    pub fn serialize<S>(
        (address, data): &(Address, Vec<u8>),
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (address, bytes::encode(data)).serialize(serializer)
    }
}

/// A single byte string parameter, as used by `eth_sendRawTransaction` and
/// `web3_sha3`.
pub mod params_bytes {
    use super::*;

    #[doc(hidden)]
    pub fn serialize<S>((data,): &(Vec<u8>,), serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (bytes::encode(data),).serialize(serializer)
    }
}
