use alloy_primitives::{keccak256, Address, U256};
use anyhow::Error;

const WORD: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
}

impl Token {
    fn to_word(self) -> [u8; WORD] {
        match self {
            Token::Address(address) => {
                let mut word = [0u8; WORD];
                word[WORD - 20..].copy_from_slice(address.as_slice());
                word
            }
            Token::Uint(value) => value.to_be_bytes::<WORD>(),
        }
    }
}

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Calldata for a function taking only static arguments.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&arg.to_word());
    }
    data
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8], Error> {
    offset
        .checked_add(WORD)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::msg(format!(
            "Return data too short: {} bytes, expected a word at offset {}",
            data.len(),
            offset
        )))
}

fn usize_at(data: &[u8], offset: usize) -> Result<usize, Error> {
    let word = word_at(data, offset)?;
    let (high, low) = word.split_at(WORD - 8);

    if high.iter().any(|b| *b != 0) {
        return Err(Error::msg(format!("Offset or length at {} out of range", offset)));
    }

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(bytes)).map_err(Error::from)
}

pub fn decode_uint(data: &[u8]) -> Result<U256, Error> {
    Ok(U256::from_be_slice(word_at(data, 0)?))
}

pub fn decode_uint_array(data: &[u8]) -> Result<Vec<U256>, Error> {
    let offset = usize_at(data, 0)?;
    let len = usize_at(data, offset)?;

    // the length word was read, so the elements start within bounds
    let elements = &data[offset + WORD..];
    if elements.len() / WORD < len {
        return Err(Error::msg(format!(
            "Return data too short for {} array elements",
            len
        )));
    }

    Ok(elements
        .chunks_exact(WORD)
        .take(len)
        .map(U256::from_be_slice)
        .collect())
}
