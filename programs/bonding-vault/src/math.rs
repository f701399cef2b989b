//! Fixed-width integer arithmetic for the curve engine.
//!
//! Amounts and supplies are `U256`. Curve weights need up to 512 bits and
//! the cross-multiplied comparisons up to 1024 bits, so every product the
//! engine forms is exact and only the documented ceilings can fail.

use anchor_lang::{require, Result};

use crate::errors::VaultError;

// No anchor prelude here: its `Result<T>` alias breaks the macro expansion.
mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer used for every amount and supply.
        pub struct U256(4);
    }

    construct_uint! {
        /// 512-bit unsigned integer holding curve weights.
        pub struct U512(8);
    }

    construct_uint! {
        /// 1024-bit unsigned integer for weight x reserve products.
        pub struct U1024(16);
    }
}

pub use wide::{U1024, U256, U512};

impl From<U256> for U512 {
    fn from(value: U256) -> Self {
        let mut words = [0u64; 8];
        words[..4].copy_from_slice(&value.0);
        U512(words)
    }
}

impl From<U256> for U1024 {
    fn from(value: U256) -> Self {
        let mut words = [0u64; 16];
        words[..4].copy_from_slice(&value.0);
        U1024(words)
    }
}

impl From<U512> for U1024 {
    fn from(value: U512) -> Self {
        let mut words = [0u64; 16];
        words[..8].copy_from_slice(&value.0);
        U1024(words)
    }
}

/// Narrow a 512-bit value, `None` if it does not fit in 256 bits.
pub fn narrow_u512(value: U512) -> Option<U256> {
    if value.0[4..].iter().any(|&w| w != 0) {
        return None;
    }
    let mut words = [0u64; 4];
    words.copy_from_slice(&value.0[..4]);
    Some(U256(words))
}

/// Narrow a 1024-bit value, `None` if it does not fit in 256 bits.
pub fn narrow_u1024(value: U1024) -> Option<U256> {
    if value.0[4..].iter().any(|&w| w != 0) {
        return None;
    }
    let mut words = [0u64; 4];
    words.copy_from_slice(&value.0[..4]);
    Some(U256(words))
}

/// `floor(a * b / denominator)` with a 512-bit intermediate.
///
/// Returns `None` on a zero denominator or when the quotient does not fit
/// in 256 bits.
pub fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let product = U512::from(a) * U512::from(b);
    narrow_u512(product / U512::from(denominator))
}

/// Convert an SPL token amount into the engine's width.
pub fn to_u256(amount: u64) -> U256 {
    U256::from(amount)
}

/// Convert an engine amount back to an SPL token amount.
pub fn to_u64(amount: U256) -> Result<u64> {
    require!(amount.bits() <= 64, VaultError::AmountTooLarge);
    Ok(amount.low_u64())
}

/// Fractional bits of the fixed-point logarithm.
pub const LOG2_FRACTION_BITS: usize = 64;

/// `log2(x)` in 64.64 fixed point, rounded toward zero.
///
/// The integer part is the position of the highest set bit; the fraction
/// is extracted one bit at a time by repeated squaring of the mantissa
/// normalised into `[2^127, 2^128)`. Every step is monotone in `x`, and the
/// absolute error stays below `2^-60`.
///
/// `x` must be non-zero; zero maps to zero.
pub fn log2_fixed(x: U256) -> u128 {
    if x.is_zero() {
        return 0;
    }
    let msb = x.bits() - 1;
    let mut result = (msb as u128) << LOG2_FRACTION_BITS;

    let mut mantissa = if msb >= 127 {
        x >> (msb - 127)
    } else {
        x << (127 - msb)
    };
    let two: U256 = U256::one() << 128usize;

    for bit in (0..LOG2_FRACTION_BITS).rev() {
        let squared = mantissa * mantissa;
        mantissa = squared >> 127usize;
        if mantissa >= two {
            mantissa = mantissa >> 1usize;
            result |= 1u128 << bit;
        }
    }
    result
}
