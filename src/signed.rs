//! Signed Byte - 8-bit two's-complement integers built from gates
//!
//! A [`SignedByte`] is exactly eight bits, most significant first. The width
//! is part of the type, so every result is wrapped back into eight bits and
//! never widened.
//!
//! # Encoding
//!
//! Non-negative integers are encoded by place-value subtraction
//! (128, 64, ..., 1). Negative integers encode their magnitude and negate it.
//! Negation is bitwise complement plus one.
//!
//! # Example
//! ```
//! use gatenet::SignedByte;
//!
//! let a = SignedByte::from_integer(-3).unwrap();
//! let b = SignedByte::from_integer(5).unwrap();
//! assert_eq!(a.add(&b).to_integer(), 2);
//! assert_eq!(a.to_string(), "-3");
//! assert!(SignedByte::from_integer(128).is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::{ripple_carry, BitSequence};
use crate::error::{GatenetError, Result};
use crate::logic::{and, not, xor};

/// Width of a signed byte in bits
pub const WIDTH: usize = 8;

/// Place values tested, most significant first, when encoding an integer
const PLACE_VALUES: [u64; WIDTH] = [128, 64, 32, 16, 8, 4, 2, 1];

/// 8-bit two's-complement integer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedByte {
    bits: [bool; WIDTH],
}

impl SignedByte {
    /// 0000_0000
    pub const ZERO: Self = Self::from_array([false; WIDTH]);

    /// 0000_0001
    pub const ONE: Self = Self::from_array([false, false, false, false, false, false, false, true]);

    /// 0111_1111 (127)
    pub const MAX: Self = Self::from_array([false, true, true, true, true, true, true, true]);

    /// 1000_0000 (-128)
    pub const MIN: Self = Self::from_array([true, false, false, false, false, false, false, false]);

    /// Create from eight bits, most significant first
    #[inline]
    pub const fn from_array(bits: [bool; WIDTH]) -> Self {
        Self { bits }
    }

    /// Create from a sequence that must be exactly eight bits wide
    pub fn from_bits(seq: &BitSequence) -> Result<Self> {
        if seq.len() != WIDTH {
            return Err(GatenetError::InvalidWidth {
                expected: WIDTH,
                actual: seq.len(),
            });
        }
        Ok(Self::fit(seq))
    }

    /// Pad or truncate an unsigned result of any width into eight bits
    ///
    /// Used whenever an intermediate (e.g. a product) is stored back as a
    /// byte. High-order bits beyond the width are dropped silently.
    pub fn fit(seq: &BitSequence) -> Self {
        let fitted = seq.truncate_left(WIDTH);
        let mut bits = [false; WIDTH];
        bits.copy_from_slice(fitted.bits());
        Self { bits }
    }

    /// Encode a host integer by place-value subtraction
    ///
    /// Fails with `Representability` outside [-128, 127].
    pub fn from_integer(n: i64) -> Result<Self> {
        if !(-128..=127).contains(&n) {
            return Err(GatenetError::unrepresentable(n, "outside [-128, 127]"));
        }

        let mut remainder = n.unsigned_abs();
        let mut bits = [false; WIDTH];
        for (slot, place) in bits.iter_mut().zip(PLACE_VALUES) {
            if remainder >= place {
                *slot = true;
                remainder -= place;
            }
        }

        let magnitude = Self { bits };
        Ok(if n < 0 { magnitude.negate() } else { magnitude })
    }

    /// Decode to a host integer
    pub fn to_integer(&self) -> i8 {
        let unsigned = self
            .bits
            .iter()
            .fold(0i16, |acc, &bit| (acc << 1) | bit as i16);
        if self.is_negative() {
            (unsigned - 256) as i8
        } else {
            unsigned as i8
        }
    }

    /// Bits, most significant first
    #[inline]
    pub fn bits(&self) -> &[bool; WIDTH] {
        &self.bits
    }

    /// As a width-8 bit sequence
    pub fn to_bits(&self) -> BitSequence {
        BitSequence::new(self.bits.to_vec())
    }

    /// Sign test: the most significant bit
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.bits[0]
    }

    /// True if every bit is clear
    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|&b| not(b))
    }

    /// Two's-complement negation: complement plus one
    ///
    /// `MIN` negates to itself.
    pub fn negate(&self) -> Self {
        let inverted = self.bits.map(not);
        let (sum, _) = ripple_carry(&inverted, &Self::ONE.bits, false);
        Self::fit(&BitSequence::new(sum))
    }

    /// Absolute value (`MIN` stays `MIN`; read it unsigned via `magnitude`)
    pub fn absolute(&self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            *self
        }
    }

    /// Unsigned magnitude as eight bits (0..=128)
    pub fn magnitude(&self) -> BitSequence {
        self.absolute().to_bits()
    }

    /// Wrapping addition
    pub fn add(&self, other: &Self) -> Self {
        self.add_with_overflow(other).0
    }

    /// Wrapping subtraction (`self + negate(other)`)
    pub fn subtract(&self, other: &Self) -> Self {
        self.subtract_with_overflow(other).0
    }

    /// Addition, `None` on signed overflow
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.add_with_overflow(other) {
            (sum, false) => Some(sum),
            (_, true) => None,
        }
    }

    /// Subtraction, `None` on signed overflow
    pub fn checked_subtract(&self, other: &Self) -> Option<Self> {
        match self.subtract_with_overflow(other) {
            (diff, false) => Some(diff),
            (_, true) => None,
        }
    }

    /// Wrapped sum plus a signed-overflow flag
    ///
    /// Overflow iff both operands share a sign the result does not.
    pub(crate) fn add_with_overflow(&self, other: &Self) -> (Self, bool) {
        let (sum, _) = ripple_carry(&self.bits, &other.bits, false);
        let sum = Self::fit(&BitSequence::new(sum));
        let same_sign = not(xor(self.is_negative(), other.is_negative()));
        let flipped = xor(sum.is_negative(), self.is_negative());
        (sum, and(same_sign, flipped))
    }

    /// Wrapped difference plus a signed-overflow flag
    ///
    /// Computed as `self + !other + 1` so `other == MIN` is handled without
    /// a separate negation.
    pub(crate) fn subtract_with_overflow(&self, other: &Self) -> (Self, bool) {
        let inverted = other.bits.map(not);
        let (diff, _) = ripple_carry(&self.bits, &inverted, true);
        let diff = Self::fit(&BitSequence::new(diff));
        let signs_differ = xor(self.is_negative(), other.is_negative());
        let flipped = xor(diff.is_negative(), self.is_negative());
        (diff, and(signs_differ, flipped))
    }

    /// Signed `self > other`
    ///
    /// Differing signs: the non-negative one is greater. Both negative:
    /// compare the negations with the operands swapped. Both non-negative:
    /// plain unsigned comparison.
    pub fn greater(&self, other: &Self) -> bool {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => true,
            (true, false) => false,
            (true, true) => unsigned_greater(&other.negate(), &self.negate()),
            (false, false) => unsigned_greater(self, other),
        }
    }
}

/// Unsigned comparison of two bytes
fn unsigned_greater(a: &SignedByte, b: &SignedByte) -> bool {
    a.bits
        .iter()
        .zip(&b.bits)
        .find(|(x, y)| xor(**x, **y))
        .map(|(&x, _)| x)
        .unwrap_or(false)
}

impl Ord for SignedByte {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.greater(other) {
            Ordering::Greater
        } else if other.greater(self) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

impl PartialOrd for SignedByte {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<i64> for SignedByte {
    type Error = GatenetError;

    fn try_from(n: i64) -> Result<Self> {
        Self::from_integer(n)
    }
}

impl TryFrom<f64> for SignedByte {
    type Error = GatenetError;

    /// Accepts only integral values in [-128, 127]
    fn try_from(x: f64) -> Result<Self> {
        if !x.is_finite() || x.fract() != 0.0 {
            return Err(GatenetError::unrepresentable(x, "not an integer"));
        }
        if !(-128.0..=127.0).contains(&x) {
            return Err(GatenetError::unrepresentable(x, "outside [-128, 127]"));
        }
        Self::from_integer(x as i64)
    }
}

impl From<SignedByte> for i8 {
    fn from(b: SignedByte) -> i8 {
        b.to_integer()
    }
}

impl fmt::Display for SignedByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_integer())
    }
}
