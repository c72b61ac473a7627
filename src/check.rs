//! Structural equality checks for test harnesses
//!
//! [`check_equal`] returns the mismatch as a value; [`assert_equal`] fails
//! the calling test with it.
//!
//! ```
//! use gatenet::check::{assert_equal, check_equal};
//! use gatenet::FixedPoint;
//!
//! let a = FixedPoint::from_decimal(1.5).unwrap();
//! assert_equal(&a.multiply(&FixedPoint::from_decimal(3.0).unwrap()), &FixedPoint::from_decimal(4.5).unwrap());
//! assert!(check_equal(&a, &FixedPoint::ONE).is_err());
//! ```

use std::fmt::Debug;

use crate::error::{GatenetError, Result};

/// Compare two values for exact structural equality
pub fn check_equal<T>(actual: &T, expected: &T) -> Result<()>
where
    T: PartialEq + Debug + ?Sized,
{
    if actual == expected {
        Ok(())
    } else {
        Err(GatenetError::Mismatch {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

/// Panic with the structural mismatch if the values differ
#[track_caller]
pub fn assert_equal<T>(actual: &T, expected: &T)
where
    T: PartialEq + Debug + ?Sized,
{
    if let Err(mismatch) = check_equal(actual, expected) {
        panic!("{}", mismatch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitSequence, SignedByte};

    #[test]
    fn test_check_equal() {
        let a = SignedByte::from_integer(3).unwrap();
        assert!(check_equal(&a, &a).is_ok());

        let err = check_equal(&a, &SignedByte::ZERO).unwrap_err();
        match err {
            GatenetError::Mismatch { expected, actual } => {
                assert!(expected.contains("false"));
                assert_ne!(expected, actual);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_check_equal_unsized() {
        let a: BitSequence = "0101".parse().unwrap();
        assert!(check_equal(a.bits(), &[false, true, false, true][..]).is_ok());
    }

    #[test]
    #[should_panic(expected = "Structural mismatch")]
    fn test_assert_equal_panics() {
        assert_equal(&SignedByte::ONE, &SignedByte::ZERO);
    }
}
