//! Bit-Sequence Arithmetic - unsigned binary arithmetic over ordered bits
//!
//! A [`BitSequence`] is stored most-significant-bit first. Its length is fixed
//! once constructed; every operation returns a new sequence.
//!
//! # Operations
//!
//! - **Padding**: `pad_left`, `truncate_left`, `truncate_leading_false`
//! - **Addition**: `add` (equal width, carry surfaced), `add_variable_length`
//! - **Shifts**: `shift_left`, `shift_left_n`, `drop_low_bits`
//! - **Multiplication**: `multiply_by_bit`, `multiply` (shift-and-add)
//! - **Comparison**: `greater` (unsigned, equal width)
//!
//! # Example
//! ```
//! use gatenet::BitSequence;
//!
//! let six: BitSequence = "0110".parse().unwrap();
//! let two: BitSequence = "0010".parse().unwrap();
//! assert_eq!(six.multiply(&two).to_unsigned(), 12);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GatenetError, Result};
use crate::logic::{and, full_adder, not};

/// Ordered sequence of bits, most significant first
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitSequence {
    bits: Vec<bool>,
}

/// Result of an equal-width addition
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitSum {
    /// Sum, same width as the operands
    pub sum: BitSequence,
    /// Carry out of the most significant position
    pub carry: bool,
}

/// Ripple-carry addition over two equal-length MSB-first slices
///
/// Callers guarantee equal lengths.
pub(crate) fn ripple_carry(a: &[bool], b: &[bool], carry_in: bool) -> (Vec<bool>, bool) {
    debug_assert_eq!(a.len(), b.len());

    let mut sum = vec![false; a.len()];
    let mut carry = carry_in;
    for i in (0..a.len()).rev() {
        let out = full_adder(a[i], b[i], carry);
        sum[i] = out.sum;
        carry = out.carry;
    }
    (sum, carry)
}

impl BitSequence {
    /// Create from bits, most significant first
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// All-zero sequence of the given width
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Encode an unsigned host integer into exactly `width` bits
    ///
    /// High-order bits that do not fit are dropped.
    pub fn from_unsigned(value: u64, width: usize) -> Self {
        let bits = (0..width)
            .rev()
            .map(|shift| shift < 64 && (value >> shift) & 1 == 1)
            .collect();
        Self { bits }
    }

    /// Unsigned reading of the sequence (low 64 bits)
    pub fn to_unsigned(&self) -> u64 {
        self.bits
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | bit as u64)
    }

    /// Number of bits
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bits, most significant first
    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Most significant bit, if any
    #[inline]
    pub fn msb(&self) -> Option<bool> {
        self.bits.first().copied()
    }

    /// True if no bit is set
    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|&b| !b)
    }

    /// Prepend zero bits until the length equals `target_len`
    ///
    /// Sequences already at least `target_len` long are returned unchanged.
    pub fn pad_left(&self, target_len: usize) -> Self {
        let missing = target_len.saturating_sub(self.len());
        let mut bits = Vec::with_capacity(self.len() + missing);
        bits.resize(missing, false);
        bits.extend_from_slice(&self.bits);
        Self { bits }
    }

    /// Concatenate `low` after `self`
    pub fn concat(&self, low: &BitSequence) -> Self {
        let mut bits = self.bits.clone();
        bits.extend_from_slice(&low.bits);
        Self { bits }
    }

    /// Bitwise NOT
    pub fn invert(&self) -> Self {
        Self {
            bits: self.bits.iter().map(|&b| not(b)).collect(),
        }
    }

    /// Equal-width ripple-carry addition
    ///
    /// The carry out of the top bit is returned alongside the sum rather
    /// than dropped.
    pub fn add(&self, other: &BitSequence, carry_in: bool) -> Result<BitSum> {
        if self.len() != other.len() {
            return Err(GatenetError::WidthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let (sum, carry) = ripple_carry(&self.bits, &other.bits, carry_in);
        Ok(BitSum {
            sum: Self { bits: sum },
            carry,
        })
    }

    /// Addition of arbitrary widths
    ///
    /// Both operands are padded to the wider width; the final carry is
    /// prepended, so the result is one bit wider than the wider input.
    pub fn add_variable_length(&self, other: &BitSequence) -> Self {
        let width = self.len().max(other.len());
        let a = self.pad_left(width);
        let b = other.pad_left(width);
        let (sum, carry) = ripple_carry(&a.bits, &b.bits, false);

        let mut bits = Vec::with_capacity(width + 1);
        bits.push(carry);
        bits.extend(sum);
        Self { bits }
    }

    /// Append a low-order zero (multiply by two)
    pub fn shift_left(&self) -> Self {
        let mut bits = self.bits.clone();
        bits.push(false);
        Self { bits }
    }

    /// Apply [`shift_left`](Self::shift_left) `n` times
    pub fn shift_left_n(&self, n: usize) -> Self {
        (0..n).fold(self.clone(), |acc, _| acc.shift_left())
    }

    /// Drop the `n` lowest-order bits (divide by 2^n, rounding toward zero)
    pub fn drop_low_bits(&self, n: usize) -> Self {
        let keep = self.len().saturating_sub(n);
        Self {
            bits: self.bits[..keep].to_vec(),
        }
    }

    /// AND every bit with `bit`: the sequence itself or all zeros
    pub fn multiply_by_bit(&self, bit: bool) -> Self {
        Self {
            bits: self.bits.iter().map(|&b| and(b, bit)).collect(),
        }
    }

    /// Unsigned shift-and-add long multiplication
    ///
    /// For every bit `i` of `other` (least significant first) the partial
    /// product `self AND other[i]`, shifted left by `i`, is accumulated with
    /// [`add_variable_length`](Self::add_variable_length).
    ///
    /// Both operands are read as non-negative magnitudes. The result grows as
    /// needed; fitting it back into a fixed width silently drops high bits.
    pub fn multiply(&self, other: &BitSequence) -> Self {
        other
            .bits
            .iter()
            .rev()
            .enumerate()
            .fold(Self::zeros(self.len()), |product, (i, &bit)| {
                let partial = self.multiply_by_bit(bit).shift_left_n(i);
                product.add_variable_length(&partial)
            })
    }

    /// Unsigned `self > other`, compared from the most significant bit
    ///
    /// Zero-length sequences compare as not greater.
    pub fn greater(&self, other: &BitSequence) -> Result<bool> {
        if self.len() != other.len() {
            return Err(GatenetError::WidthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        for (&a, &b) in self.bits.iter().zip(&other.bits) {
            if a != b {
                return Ok(a);
            }
        }
        Ok(false)
    }

    /// Drop leading zero bits (an all-zero sequence becomes empty)
    pub fn truncate_leading_false(&self) -> Self {
        Self {
            bits: self.bits.iter().copied().skip_while(|&b| !b).collect(),
        }
    }

    /// Force the length to `target_len`, keeping the low-order bits
    ///
    /// Longer sequences lose their leading bits, shorter ones are padded.
    pub fn truncate_left(&self, target_len: usize) -> Self {
        if self.len() <= target_len {
            return self.pad_left(target_len);
        }
        Self {
            bits: self.bits[self.len() - target_len..].to_vec(),
        }
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self::new(bits)
    }
}

impl FromStr for BitSequence {
    type Err = GatenetError;

    /// Parse `0`/`1` digits, most significant first; `_` separators are ignored
    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .filter(|&c| c != '_')
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(GatenetError::unrepresentable(s, "bit literals use only 0 and 1")),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
