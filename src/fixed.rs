//! Fixed-Point Value - a Signed Byte read in eighths
//!
//! Layout: one sign bit, four integer bits, three fractional bits. The
//! numeric value is `integer_reading / 8`, so the representable set is the
//! multiples of 0.125 in [-16, 15.875].
//!
//! Addition and subtraction are Signed Byte addition and subtraction (the
//! shared scale cancels). Multiplication multiplies the magnitudes, drops the
//! low three bits of the 16-bit product to undo the doubled scale, fits the
//! result back into a byte and restores the sign.
//!
//! # Example
//! ```
//! use gatenet::FixedPoint;
//!
//! let a = FixedPoint::from_decimal(1.5).unwrap();
//! let b = FixedPoint::from_decimal(3.0).unwrap();
//! assert_eq!(a.multiply(&b).to_f64(), 4.5);
//! assert_eq!(a.raw().to_integer(), 12);
//!
//! let c: FixedPoint = "-2.5".parse().unwrap();
//! assert_eq!(c.add(&FixedPoint::ONE).to_string(), "-1.5");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bits::BitSequence;
use crate::config::OverflowPolicy;
use crate::error::{GatenetError, Result};
use crate::logic::{and, not, xor};
use crate::signed::{SignedByte, WIDTH};

/// Number of fractional bits
pub const FRACTION_BITS: usize = 3;

/// Smallest representable value
pub const MIN_VALUE: f64 = -16.0;

/// Largest representable value
pub const MAX_VALUE: f64 = 15.875;

/// Representation step
pub const STEP: f64 = 0.125;

/// Nonzero eighths and their three-bit encodings
const FRACTION_TABLE: [(f64, [bool; FRACTION_BITS]); 7] = [
    (0.125, [false, false, true]),
    (0.25, [false, true, false]),
    (0.375, [false, true, true]),
    (0.5, [true, false, false]),
    (0.625, [true, false, true]),
    (0.75, [true, true, false]),
    (0.875, [true, true, true]),
];

/// Fixed-point decimal with scale 1/8
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPoint {
    raw: SignedByte,
}

impl FixedPoint {
    pub const ZERO: Self = Self::from_raw(SignedByte::ZERO);

    /// 1.0 (reading 8)
    pub const ONE: Self =
        Self::from_raw(SignedByte::from_array([false, false, false, false, true, false, false, false]));

    /// -2.0 (reading -16)
    pub const MINUS_TWO: Self =
        Self::from_raw(SignedByte::from_array([true, true, true, true, false, false, false, false]));

    /// 15.875
    pub const MAX: Self = Self::from_raw(SignedByte::MAX);

    /// -16.0
    pub const MIN: Self = Self::from_raw(SignedByte::MIN);

    /// Reinterpret a Signed Byte as eighths
    #[inline]
    pub const fn from_raw(raw: SignedByte) -> Self {
        Self { raw }
    }

    /// Underlying Signed Byte (the integer reading)
    #[inline]
    pub const fn raw(&self) -> SignedByte {
        self.raw
    }

    /// Encode a decimal number
    ///
    /// Fails with `Representability` for values that are not multiples of
    /// 0.125 or lie outside [-16, 15.875]. The integer part goes through
    /// Signed Byte encoding, the fraction through the eighths table; the two
    /// are concatenated and fit to eight bits.
    pub fn from_decimal(x: f64) -> Result<Self> {
        if !x.is_finite() || (x * 8.0).fract() != 0.0 {
            return Err(GatenetError::unrepresentable(x, "not a multiple of 0.125"));
        }
        if !(MIN_VALUE..=MAX_VALUE).contains(&x) {
            return Err(GatenetError::unrepresentable(x, "outside [-16, 15.875]"));
        }

        let magnitude = x.abs();
        let integer = SignedByte::from_integer(magnitude.trunc() as i64)?;
        let fraction = fraction_bits(magnitude.fract());

        let encoded = SignedByte::fit(&integer.to_bits().concat(&fraction));
        let raw = if x < 0.0 { encoded.negate() } else { encoded };
        Ok(Self { raw })
    }

    /// Decode to a host float (exact)
    pub fn to_f64(&self) -> f64 {
        self.raw.to_integer() as f64 / 8.0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.raw.is_negative()
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        and(not(self.is_negative()), not(self.is_zero()))
    }

    pub fn negate(&self) -> Self {
        Self::from_raw(self.raw.negate())
    }

    /// Wrapping addition
    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(self.raw.add(&other.raw))
    }

    /// Wrapping subtraction
    pub fn subtract(&self, other: &Self) -> Self {
        Self::from_raw(self.raw.subtract(&other.raw))
    }

    /// Multiplication with silent truncation of out-of-range products
    ///
    /// Precondition: the true product fits in [-16, 15.875]. Fractional
    /// bits below 1/8 are truncated toward zero.
    pub fn multiply(&self, other: &Self) -> Self {
        self.multiply_parts(other).0
    }

    /// Addition under an overflow policy
    pub fn add_with(&self, other: &Self, policy: OverflowPolicy) -> Result<Self> {
        let (sum, overflowed) = self.raw.add_with_overflow(&other.raw);
        // On overflow both operands share the sign of the true result
        let saturated = saturate_toward(self.is_negative());
        policy.resolve("add", Self::from_raw(sum), overflowed, saturated)
    }

    /// Subtraction under an overflow policy
    pub fn subtract_with(&self, other: &Self, policy: OverflowPolicy) -> Result<Self> {
        let (diff, overflowed) = self.raw.subtract_with_overflow(&other.raw);
        let saturated = saturate_toward(self.is_negative());
        policy.resolve("subtract", Self::from_raw(diff), overflowed, saturated)
    }

    /// Multiplication under an overflow policy
    pub fn multiply_with(&self, other: &Self, policy: OverflowPolicy) -> Result<Self> {
        let (product, overflowed) = self.multiply_parts(other);
        let negative = xor(self.is_negative(), other.is_negative());
        policy.resolve("multiply", product, overflowed, saturate_toward(negative))
    }

    /// Wrapped product plus an overflow flag
    fn multiply_parts(&self, other: &Self) -> (Self, bool) {
        let product = self.raw.magnitude().multiply(&other.raw.magnitude());
        let rescaled = product.drop_low_bits(FRACTION_BITS);

        let negative = xor(self.is_negative(), other.is_negative());
        let magnitude = SignedByte::fit(&rescaled);
        let raw = if negative { magnitude.negate() } else { magnitude };

        // Largest magnitude the result sign can hold: 128 negative, 127 positive
        let limit = if negative { 128 } else { 127 };
        let width = rescaled.len().max(WIDTH);
        let overflowed = rescaled
            .pad_left(width)
            .greater(&BitSequence::from_unsigned(limit, width))
            .unwrap_or(false);

        (Self::from_raw(raw), overflowed)
    }
}

/// Bound a saturating operation clamps to
fn saturate_toward(negative: bool) -> FixedPoint {
    if negative {
        FixedPoint::MIN
    } else {
        FixedPoint::MAX
    }
}

/// Three-bit encoding of an exact eighths fraction; zero needs no table entry
fn fraction_bits(fraction: f64) -> BitSequence {
    FRACTION_TABLE
        .iter()
        .find(|(value, _)| *value == fraction)
        .map(|(_, bits)| BitSequence::new(bits.to_vec()))
        .unwrap_or_else(|| BitSequence::zeros(FRACTION_BITS))
}

impl OverflowPolicy {
    /// Pick the wrapped value, the saturated bound or an error
    pub(crate) fn resolve(
        self,
        operation: &'static str,
        wrapped: FixedPoint,
        overflowed: bool,
        saturated: FixedPoint,
    ) -> Result<FixedPoint> {
        if !overflowed {
            return Ok(wrapped);
        }
        match self {
            OverflowPolicy::Wrap => Ok(wrapped),
            OverflowPolicy::Saturate => {
                log::warn!(
                    "{} overflowed, saturating to {} (wrapped value {})",
                    operation,
                    saturated,
                    wrapped
                );
                Ok(saturated)
            }
            OverflowPolicy::Error => Err(GatenetError::Overflow { operation }),
        }
    }
}

impl Ord for FixedPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl PartialOrd for FixedPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<f64> for FixedPoint {
    type Error = GatenetError;

    fn try_from(x: f64) -> Result<Self> {
        Self::from_decimal(x)
    }
}

impl From<FixedPoint> for f64 {
    fn from(x: FixedPoint) -> f64 {
        x.to_f64()
    }
}

impl FromStr for FixedPoint {
    type Err = GatenetError;

    /// Parse a decimal literal such as `-1.375` exactly
    fn from_str(s: &str) -> Result<Self> {
        let literal = s.trim();
        let (negative, digits) = match literal.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, literal.strip_prefix('+').unwrap_or(literal)),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

        let malformed = || GatenetError::unrepresentable(s, "not a decimal literal");
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        let frac_part = frac_part.trim_end_matches('0');
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        // Any multiple of 1/8 terminates within three decimal places
        if frac_part.len() > 3 {
            return Err(GatenetError::unrepresentable(s, "not a multiple of 0.125"));
        }

        let integer: u32 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| GatenetError::unrepresentable(s, "outside [-16, 15.875]"))?
        };
        let thousandths: u32 = format!("{:0<3}", frac_part).parse().map_err(|_| malformed())?;
        if thousandths % 125 != 0 {
            return Err(GatenetError::unrepresentable(s, "not a multiple of 0.125"));
        }

        let magnitude = integer as f64 + thousandths as f64 / 1000.0;
        let value = if negative { -magnitude } else { magnitude };
        Self::from_decimal(value).map_err(|_| GatenetError::unrepresentable(s, "outside [-16, 15.875]"))
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}
