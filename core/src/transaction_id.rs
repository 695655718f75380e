// core/src/transaction_id.rs

//! Merchant transaction identifiers.
//!
//! One identifier is minted per checkout attempt, before the gateway is
//! contacted, and it is the key both the pay call and the later status query
//! are correlated on. Format: `TXN_<unix millis>_<10 base36 chars>`, well
//! under the gateway's 38 character limit.

use chrono::Utc;
use rand_core::{OsRng, RngCore};

pub const MAX_LEN: usize = 38;
const PREFIX: &str = "TXN";
const SUFFIX_LEN: usize = 10;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn new_merchant_transaction_id() -> String {
    let millis = Utc::now().timestamp_millis();
    format!("{}_{}_{}", PREFIX, millis, random_suffix())
}

// 36^10 suffixes per millisecond.
fn random_suffix() -> String {
    let mut value = OsRng.next_u64();
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}

/// Accepts what the gateway accepts: 1..=38 chars of `[A-Za-z0-9_-]`.
pub fn is_valid(merchant_transaction_id: &str) -> bool {
    !merchant_transaction_id.is_empty()
        && merchant_transaction_id.len() <= MAX_LEN
        && merchant_transaction_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
