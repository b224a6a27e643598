//! Canonical Ethereum address derived from an arbitrary-precision integer.

use std::fmt;

use num_bigint::BigUint;
use num_traits::Num;
use serde::Serialize;

use crate::error::AdapterError;

/// Number of hex digits after the `0x` prefix.
pub const ADDRESS_HEX_DIGITS: usize = 40;
const ADDRESS_BITS: u64 = 160;

/// A 42-character lowercase hex string: `0x` followed by exactly 40 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EthAddress(String);

impl EthAddress {
    /// Parses a non-negative integer written in decimal, or with a `0x`, `0o`
    /// or `0b` prefix, and zero-pads its hex form to 40 digits.
    ///
    /// Values wider than 160 bits are rejected rather than passed through.
    pub fn parse(input: &str) -> Result<Self, AdapterError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AdapterError::Validation("ethAddress must not be empty".into()));
        }
        let (radix, digits) = match input.get(..2).map(str::to_ascii_lowercase).as_deref() {
            Some("0x") => (16, &input[2..]),
            Some("0o") => (8, &input[2..]),
            Some("0b") => (2, &input[2..]),
            _ => (10, input),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(AdapterError::Validation(format!(
                "ethAddress is not a non-negative integer: {input}"
            )));
        }
        let value = BigUint::from_str_radix(digits, radix).map_err(|e| {
            AdapterError::Validation(format!("ethAddress is not a non-negative integer: {e}"))
        })?;
        Self::from_uint(&value)
    }

    pub fn from_uint(value: &BigUint) -> Result<Self, AdapterError> {
        if value.bits() > ADDRESS_BITS {
            return Err(AdapterError::Validation(format!(
                "ethAddress does not fit in {ADDRESS_BITS} bits: 0x{}",
                value.to_str_radix(16)
            )));
        }
        Ok(Self(format!("0x{:0>width$}", value.to_str_radix(16), width = ADDRESS_HEX_DIGITS)))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Display name used when the repository has no description: `0x123...cdef`.
    pub fn short_name(&self) -> String { format!("{}...{}", &self.0[..5], &self.0[38..]) }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}
