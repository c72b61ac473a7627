//! Vector Algebra over fixed-point values
//!
//! Every operation is elementwise and preserves dimension. Binary operations
//! reject operands of different dimension with `DimensionMismatch`.
//!
//! The plain methods wrap on overflow; the `*_with` variants take an
//! [`OverflowPolicy`].

use serde::{Deserialize, Serialize};

use crate::config::OverflowPolicy;
use crate::error::{GatenetError, Result};
use crate::fixed::FixedPoint;

/// Fixed-length sequence of fixed-point values
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    elements: Vec<FixedPoint>,
}

impl Vector {
    pub fn new(elements: Vec<FixedPoint>) -> Self {
        Self { elements }
    }

    /// Encode every number with [`FixedPoint::from_decimal`]
    pub fn from_numbers(xs: &[f64]) -> Result<Self> {
        xs.iter()
            .map(|&x| FixedPoint::from_decimal(x))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            elements: vec![FixedPoint::ZERO; dim],
        }
    }

    /// Dimensionality
    #[inline]
    pub fn dim(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn elements(&self) -> &[FixedPoint] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<FixedPoint> {
        self.elements.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FixedPoint> {
        self.elements.iter()
    }

    /// Decode every element
    pub fn to_f64s(&self) -> Vec<f64> {
        self.elements.iter().map(FixedPoint::to_f64).collect()
    }

    fn check_dim(&self, other: &Vector) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(GatenetError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }

    /// Apply `op` to matching elements
    fn zip_with<F>(&self, other: &Vector, op: F) -> Result<Vector>
    where
        F: Fn(&FixedPoint, &FixedPoint) -> Result<FixedPoint>,
    {
        self.check_dim(other)?;
        self.elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| op(a, b))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Multiply every element by `scalar`
    pub fn scalar_multiply(&self, scalar: FixedPoint) -> Vector {
        Self::new(self.elements.iter().map(|x| scalar.multiply(x)).collect())
    }

    pub fn scalar_multiply_with(&self, scalar: FixedPoint, policy: OverflowPolicy) -> Result<Vector> {
        self.elements
            .iter()
            .map(|x| scalar.multiply_with(x, policy))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Elementwise sum
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.add_with(other, OverflowPolicy::Wrap)
    }

    pub fn add_with(&self, other: &Vector, policy: OverflowPolicy) -> Result<Vector> {
        self.zip_with(other, |a, b| a.add_with(b, policy))
    }

    /// Elementwise difference
    pub fn subtract(&self, other: &Vector) -> Result<Vector> {
        self.subtract_with(other, OverflowPolicy::Wrap)
    }

    pub fn subtract_with(&self, other: &Vector, policy: OverflowPolicy) -> Result<Vector> {
        self.zip_with(other, |a, b| a.subtract_with(b, policy))
    }

    /// Elementwise (Hadamard) product
    pub fn pointwise_multiply(&self, other: &Vector) -> Result<Vector> {
        self.pointwise_multiply_with(other, OverflowPolicy::Wrap)
    }

    pub fn pointwise_multiply_with(&self, other: &Vector, policy: OverflowPolicy) -> Result<Vector> {
        self.zip_with(other, |a, b| a.multiply_with(b, policy))
    }

    /// Left fold with fixed-point addition, starting from zero
    pub fn sum(&self) -> FixedPoint {
        self.elements
            .iter()
            .fold(FixedPoint::ZERO, |acc, x| acc.add(x))
    }

    pub fn sum_with(&self, policy: OverflowPolicy) -> Result<FixedPoint> {
        self.elements
            .iter()
            .try_fold(FixedPoint::ZERO, |acc, x| acc.add_with(x, policy))
    }

    /// Sum of the pointwise product
    pub fn inner_product(&self, other: &Vector) -> Result<FixedPoint> {
        Ok(self.pointwise_multiply(other)?.sum())
    }

    pub fn inner_product_with(&self, other: &Vector, policy: OverflowPolicy) -> Result<FixedPoint> {
        self.pointwise_multiply_with(other, policy)?.sum_with(policy)
    }
}

impl From<Vec<FixedPoint>> for Vector {
    fn from(elements: Vec<FixedPoint>) -> Self {
        Self::new(elements)
    }
}

impl FromIterator<FixedPoint> for Vector {
    fn from_iter<I: IntoIterator<Item = FixedPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(xs: &[f64]) -> Vector {
        Vector::from_numbers(xs).unwrap()
    }

    fn fp(x: f64) -> FixedPoint {
        FixedPoint::from_decimal(x).unwrap()
    }

    #[test]
    fn test_from_numbers() {
        let v = vec_of(&[1.0, -0.5, 2.25]);
        assert_eq!(v.dim(), 3);
        assert_eq!(v.to_f64s(), vec![1.0, -0.5, 2.25]);

        assert!(Vector::from_numbers(&[1.0, 0.3]).is_err());
        assert!(Vector::from_numbers(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_multiply() {
        let v = vec_of(&[1.0, -2.0, 0.5]);
        assert_eq!(v.scalar_multiply(fp(1.5)), vec_of(&[1.5, -3.0, 0.75]));
        assert_eq!(v.scalar_multiply(FixedPoint::ZERO), Vector::zeros(3));
    }

    #[test]
    fn test_add_and_subtract() {
        let a = vec_of(&[1.0, 2.0]);
        let b = vec_of(&[0.5, -3.0]);
        assert_eq!(a.add(&b).unwrap(), vec_of(&[1.5, -1.0]));
        assert_eq!(a.subtract(&b).unwrap(), vec_of(&[0.5, 5.0]));
    }

    #[test]
    fn test_pointwise_multiply() {
        let a = vec_of(&[1.5, -1.0, 2.0]);
        let b = vec_of(&[2.0, 3.0, -0.25]);
        assert_eq!(a.pointwise_multiply(&b).unwrap(), vec_of(&[3.0, -3.0, -0.5]));
    }

    #[test]
    fn test_sum_and_inner_product() {
        assert_eq!(vec_of(&[1.0, -2.5, 0.125]).sum(), fp(-1.375));
        assert_eq!(Vector::zeros(0).sum(), FixedPoint::ZERO);

        let w = vec_of(&[0.5, 1.0]);
        let x = vec_of(&[1.0, -1.0]);
        assert_eq!(w.inner_product(&x).unwrap(), fp(-0.5));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = vec_of(&[1.0, 2.0]);
        let b = vec_of(&[1.0, 2.0, 3.0]);
        let expected = GatenetError::DimensionMismatch {
            expected: 2,
            actual: 3,
        };
        assert_eq!(a.add(&b).unwrap_err(), expected);
        assert_eq!(a.pointwise_multiply(&b).unwrap_err(), expected);
        assert_eq!(a.inner_product(&b).unwrap_err(), expected);
    }

    #[test]
    fn test_policy_variants() {
        let v = vec_of(&[8.0, 8.0]);
        assert!(v.sum_with(OverflowPolicy::Error).is_err());
        assert_eq!(v.sum_with(OverflowPolicy::Saturate).unwrap(), FixedPoint::MAX);
        assert!(v.scalar_multiply_with(fp(4.0), OverflowPolicy::Error).is_err());
        assert_eq!(
            v.inner_product_with(&vec_of(&[0.5, 0.5]), OverflowPolicy::Error).unwrap(),
            fp(8.0)
        );
    }

    #[test]
    fn test_collect() {
        let v: Vector = [fp(1.0), fp(2.0)].into_iter().collect();
        assert_eq!(v, vec_of(&[1.0, 2.0]));
        assert_eq!(v.get(1), Some(fp(2.0)));
        assert_eq!(v.get(2), None);
    }
}
