//! Minimal ABI handling for the mint contract: zero-argument calls and
//! single-word return values.

use alloy_primitives::{keccak256, Address, Bytes, U256};

pub const PRESALE_STARTED: &str = "presaleStarted()";
pub const PRESALE_ENDED: &str = "presaleEnded()";
pub const TOKEN_IDS: &str = "tokenIds()";
pub const OWNER: &str = "owner()";
pub const PRESALE_MINT: &str = "presaleMint()";
pub const MINT: &str = "mint()";
pub const START_PRESALE: &str = "startPresale()";

const WORD: usize = 32;

/// First four bytes of the keccak hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for a function that takes no arguments.
pub fn encode_call(signature: &str) -> Bytes {
    Bytes::copy_from_slice(&selector(signature))
}

fn first_word<'a>(data: &'a [u8], what: &str) -> Result<&'a [u8], crate::Error> {
    data.get(..WORD).ok_or_else(|| {
        crate::Error::Decode(format!(
            "{what}: expected at least {WORD} bytes, got {}",
            data.len()
        ))
    })
}

pub fn decode_uint(data: &[u8]) -> Result<U256, crate::Error> {
    Ok(U256::from_be_slice(first_word(data, "uint256")?))
}

pub fn decode_bool(data: &[u8]) -> Result<bool, crate::Error> {
    let value = decode_uint(data)?;
    if value > U256::from(1) {
        return Err(crate::Error::Decode(format!("bool: out of range {value}")));
    }
    Ok(value == U256::from(1))
}

pub fn decode_address(data: &[u8]) -> Result<Address, crate::Error> {
    let word = first_word(data, "address")?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(crate::Error::Decode("address: dirty high bytes".into()));
    }
    Ok(Address::from_slice(&word[12..]))
}
