//! Encodings of the records stored per bid: bid id lists are ABI `bytes16[]`, bundles are JSON.

use alloy_primitives::Bytes;
use ethers::abi::{self, ParamType, Token};
use suave_types::{BidId, Bundle};

pub fn encode_bid_ids(bid_ids: &[BidId]) -> Bytes {
    let tokens = bid_ids.iter().map(|id| Token::FixedBytes(id.to_vec())).collect();
    abi::encode(&[Token::Array(tokens)]).into()
}

pub fn decode_bid_ids(data: &[u8]) -> Result<Vec<BidId>, abi::Error> {
    let mut tokens =
        abi::decode(&[ParamType::Array(Box::new(ParamType::FixedBytes(16)))], data)?;

    let Some(Token::Array(ids)) = tokens.pop() else {
        return Err(abi::Error::InvalidData);
    };

    ids.into_iter()
        .map(|token| match token {
            Token::FixedBytes(bytes) if bytes.len() == 16 => Ok(BidId::from_slice(&bytes)),
            _ => Err(abi::Error::InvalidData),
        })
        .collect()
}

pub fn encode_bundle(bundle: &Bundle) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(bundle).map(Bytes::from)
}

pub fn decode_bundle(data: &[u8]) -> Result<Bundle, serde_json::Error> {
    serde_json::from_slice(data)
}
