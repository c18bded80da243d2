//! Fixed ABI schemas of the precompile inputs. Each input is decoded in a single step that
//! fails closed with [`PrecompileError::MalformedInput`] on any shape mismatch.

use alloy_primitives::{Address, Bytes, B256};
use ethers::{
    abi::{self, ParamType, Token},
    types::{H160, U256},
};
use suave_types::{BidId, BuildBlockArgs, Withdrawal};

use crate::error::PrecompileError;

/// Length of a compressed BLS public key.
pub const PROPOSER_PUBKEY_LEN: usize = 48;

pub trait HandlerInput: Sized {
    fn param_types() -> Vec<ParamType>;

    fn from_tokens(tokens: Vec<Token>) -> Option<Self>;

    fn to_tokens(&self) -> Vec<Token>;

    fn decode(input: &[u8]) -> Result<Self, PrecompileError> {
        let tokens = abi::decode(&Self::param_types(), input).map_err(|err| {
            PrecompileError::MalformedInput(format!("could not unpack inputs: {err}"))
        })?;
        Self::from_tokens(tokens).ok_or_else(|| {
            PrecompileError::MalformedInput("inputs do not match handler schema".to_string())
        })
    }

    fn encode(&self) -> Vec<u8> {
        abi::encode(&self.to_tokens())
    }
}

/// `buildEthBlock(BuildBlockArgs, bytes16 bidId, string namespace)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEthBlockInput {
    pub args: BuildBlockArgs,
    pub bid_id: BidId,
    pub namespace: String,
}

impl HandlerInput for BuildEthBlockInput {
    fn param_types() -> Vec<ParamType> {
        let withdrawal = ParamType::Tuple(vec![
            ParamType::Uint(64),
            ParamType::Uint(64),
            ParamType::Address,
            ParamType::Uint(64),
        ]);
        let args = ParamType::Tuple(vec![
            ParamType::Uint(64),
            ParamType::Bytes,
            ParamType::FixedBytes(32),
            ParamType::Uint(64),
            ParamType::Address,
            ParamType::Uint(64),
            ParamType::FixedBytes(32),
            ParamType::Array(Box::new(withdrawal)),
        ]);
        vec![args, ParamType::FixedBytes(16), ParamType::String]
    }

    fn from_tokens(tokens: Vec<Token>) -> Option<Self> {
        let [args, bid_id, namespace] = <[Token; 3]>::try_from(tokens).ok()?;
        Some(Self {
            args: build_block_args(args)?,
            bid_id: BidId::from_slice(&fixed_bytes(bid_id, 16)?),
            namespace: namespace.into_string()?,
        })
    }

    fn to_tokens(&self) -> Vec<Token> {
        let args = &self.args;
        let withdrawals = args
            .withdrawals
            .iter()
            .map(|w| {
                Token::Tuple(vec![
                    uint_token(w.index),
                    uint_token(w.validator),
                    address_token(w.address),
                    uint_token(w.amount),
                ])
            })
            .collect();

        vec![
            Token::Tuple(vec![
                uint_token(args.slot),
                Token::Bytes(args.proposer_pubkey.to_vec()),
                Token::FixedBytes(args.parent.to_vec()),
                uint_token(args.timestamp),
                address_token(args.fee_recipient),
                uint_token(args.gas_limit),
                Token::FixedBytes(args.random.to_vec()),
                Token::Array(withdrawals),
            ]),
            Token::FixedBytes(self.bid_id.to_vec()),
            Token::String(self.namespace.clone()),
        ]
    }
}

/// `submitEthBlockBidToRelay(string relayUrl, bytes builderBid)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitBlockBidInput {
    pub relay_url: String,
    pub builder_bid: Bytes,
}

impl HandlerInput for SubmitBlockBidInput {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::String, ParamType::Bytes]
    }

    fn from_tokens(tokens: Vec<Token>) -> Option<Self> {
        let [relay_url, builder_bid] = <[Token; 2]>::try_from(tokens).ok()?;
        Some(Self {
            relay_url: relay_url.into_string()?,
            builder_bid: builder_bid.into_bytes()?.into(),
        })
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::String(self.relay_url.clone()), Token::Bytes(self.builder_bid.to_vec())]
    }
}

/// `submitBundleJsonRPC(string url, string method, bytes params)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitBundleJsonRpcInput {
    pub url: String,
    pub method: String,
    pub params: Bytes,
}

impl HandlerInput for SubmitBundleJsonRpcInput {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::String, ParamType::String, ParamType::Bytes]
    }

    fn from_tokens(tokens: Vec<Token>) -> Option<Self> {
        let [url, method, params] = <[Token; 3]>::try_from(tokens).ok()?;
        Some(Self {
            url: url.into_string()?,
            method: method.into_string()?,
            params: params.into_bytes()?.into(),
        })
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::String(self.url.clone()),
            Token::String(self.method.clone()),
            Token::Bytes(self.params.to_vec()),
        ]
    }
}

/// `fillMevShareBundle(bytes16 bidId)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillMevShareBundleInput {
    pub bid_id: BidId,
}

impl HandlerInput for FillMevShareBundleInput {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::FixedBytes(16)]
    }

    fn from_tokens(tokens: Vec<Token>) -> Option<Self> {
        let [bid_id] = <[Token; 1]>::try_from(tokens).ok()?;
        Some(Self { bid_id: BidId::from_slice(&fixed_bytes(bid_id, 16)?) })
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::FixedBytes(self.bid_id.to_vec())]
    }
}

/// `(bytes bundleJson)`, shared by `simulateBundle` and `extractHint`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleInput {
    pub bundle: Bytes,
}

impl HandlerInput for BundleInput {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::Bytes]
    }

    fn from_tokens(tokens: Vec<Token>) -> Option<Self> {
        let [bundle] = <[Token; 1]>::try_from(tokens).ok()?;
        Some(Self { bundle: bundle.into_bytes()?.into() })
    }

    fn to_tokens(&self) -> Vec<Token> {
        vec![Token::Bytes(self.bundle.to_vec())]
    }
}

pub fn encode_bytes_output(outputs: Vec<Bytes>) -> Bytes {
    let tokens: Vec<Token> = outputs.into_iter().map(|b| Token::Bytes(b.to_vec())).collect();
    abi::encode(&tokens).into()
}

pub fn encode_u64_output(value: u64) -> Bytes {
    abi::encode(&[uint_token(value)]).into()
}

fn build_block_args(token: Token) -> Option<BuildBlockArgs> {
    let fields = token.into_tuple()?;
    let [slot, proposer_pubkey, parent, timestamp, fee_recipient, gas_limit, random, withdrawals] =
        <[Token; 8]>::try_from(fields).ok()?;

    let withdrawals = withdrawals
        .into_array()?
        .into_iter()
        .map(|w| {
            let [index, validator, address, amount] =
                <[Token; 4]>::try_from(w.into_tuple()?).ok()?;
            Some(Withdrawal {
                index: uint64(index)?,
                validator: uint64(validator)?,
                address: self::address(address)?,
                amount: uint64(amount)?,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(BuildBlockArgs {
        slot: uint64(slot)?,
        proposer_pubkey: proposer_pubkey
            .into_bytes()
            .filter(|pubkey| pubkey.len() == PROPOSER_PUBKEY_LEN)?
            .into(),
        parent: B256::from_slice(&fixed_bytes(parent, 32)?),
        timestamp: uint64(timestamp)?,
        fee_recipient: address(fee_recipient)?,
        gas_limit: uint64(gas_limit)?,
        random: B256::from_slice(&fixed_bytes(random, 32)?),
        withdrawals,
    })
}

fn uint64(token: Token) -> Option<u64> {
    let value = token.into_uint()?;
    (value <= U256::from(u64::MAX)).then(|| value.as_u64())
}

fn address(token: Token) -> Option<Address> {
    token.into_address().map(|a| Address::from(a.0))
}

fn fixed_bytes(token: Token, len: usize) -> Option<Vec<u8>> {
    token.into_fixed_bytes().filter(|bytes| bytes.len() == len)
}

fn uint_token(value: u64) -> Token {
    Token::Uint(U256::from(value))
}

fn address_token(address: Address) -> Token {
    Token::Address(H160::from(address.0 .0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_input() -> BuildEthBlockInput {
        BuildEthBlockInput {
            args: BuildBlockArgs {
                slot: 7,
                proposer_pubkey: Bytes::from(vec![0xaa; 48]),
                parent: B256::repeat_byte(1),
                timestamp: 1_700_000_000,
                fee_recipient: Address::repeat_byte(2),
                gas_limit: 30_000_000,
                random: B256::repeat_byte(3),
                withdrawals: vec![Withdrawal {
                    index: 1,
                    validator: 2,
                    address: Address::repeat_byte(4),
                    amount: 5,
                }],
            },
            bid_id: BidId::repeat_byte(9),
            namespace: "default:v0:ethBundles".to_string(),
        }
    }

    #[test]
    fn test_build_eth_block_input() {
        let input = build_input();
        let decoded = BuildEthBlockInput::decode(&input.encode()).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_malformed_input() {
        let res = BuildEthBlockInput::decode(&[1, 2, 3]);
        assert!(matches!(res, Err(PrecompileError::MalformedInput(_))));

        // well formed abi, wrong handler schema
        let other = SubmitBundleJsonRpcInput {
            url: "http://localhost".to_string(),
            method: "mev_sendBundle".to_string(),
            params: Bytes::from_static(b"{}"),
        };
        let res = BuildEthBlockInput::decode(&other.encode());
        assert!(matches!(res, Err(PrecompileError::MalformedInput(_))));
    }

    #[test]
    fn test_uint64_out_of_range() {
        let mut tokens = build_input().to_tokens();
        let Token::Tuple(fields) = &mut tokens[0] else { unreachable!() };
        fields[0] = Token::Uint(U256::from(u64::MAX) + 1);

        let res = BuildEthBlockInput::decode(&abi::encode(&tokens));
        assert!(matches!(res, Err(PrecompileError::MalformedInput(_))));
    }

    #[test]
    fn test_short_proposer_pubkey() {
        let mut input = build_input();
        input.args.proposer_pubkey = Bytes::from(vec![0xaa; 20]);

        let res = BuildEthBlockInput::decode(&input.encode());
        assert!(matches!(res, Err(PrecompileError::MalformedInput(_))));
    }

    #[test]
    fn test_fill_input() {
        let input = FillMevShareBundleInput { bid_id: BidId::repeat_byte(5) };
        assert_eq!(FillMevShareBundleInput::decode(&input.encode()).unwrap(), input);
    }
}
