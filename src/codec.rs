//! Base64 text encoding of big integers for JSON payloads.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigUint;

pub fn encode_biguint(value: &BigUint) -> String {
    STANDARD.encode(value.to_bytes_be())
}

pub fn decode_biguint(text: &str) -> Option<BigUint> {
    let bytes = STANDARD.decode(text).ok()?;
    Some(BigUint::from_bytes_be(&bytes))
}

/// `#[serde(with = "crate::codec::biguint")]`
pub(crate) mod biguint {
    use num_bigint::BigUint;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_biguint(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode_biguint(&text).ok_or_else(|| D::Error::custom("invalid base64 integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_big_endian_bytes() {
        assert_eq!(encode_biguint(&BigUint::from(0x0102_0304u32)), "AQIDBA==");
        assert_eq!(decode_biguint("AQIDBA=="), Some(BigUint::from(0x0102_0304u32)));
        assert_eq!(decode_biguint("not base64!"), None);
    }
}
