//! Encoding of the three persisted documents: balance, transaction list and group list.
//!
//! All three are stored as JSON. Decoding is strict; callers decide what to do
//! with a value that does not decode.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{Amount, Group, Transaction};

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Balance is not a finite number: {0}")]
    NonFiniteBalance(Amount),

    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// JSON numbers cannot carry NaN or infinities, so those never reach the store.
pub fn encode_balance(balance: Amount) -> Result<Vec<u8>, CodecError> {
    if !balance.is_finite() {
        return Err(CodecError::NonFiniteBalance(balance));
    }
    encode(&balance)
}

pub fn decode_balance(bytes: &[u8]) -> Result<Amount, CodecError> {
    decode(bytes)
}

pub fn encode_transactions(transactions: &[Transaction]) -> Result<Vec<u8>, CodecError> {
    encode(transactions)
}

pub fn decode_transactions(bytes: &[u8]) -> Result<Vec<Transaction>, CodecError> {
    decode(bytes)
}

pub fn encode_groups(groups: &[Group]) -> Result<Vec<u8>, CodecError> {
    encode(groups)
}

pub fn decode_groups(bytes: &[u8]) -> Result<Vec<Group>, CodecError> {
    decode(bytes)
}
