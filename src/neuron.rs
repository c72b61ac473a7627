//! Neuron / Layer Model
//!
//! An affine neuron computes `weight · input + bias`. A [`Layer`] is an
//! ordered list of neurons sharing one input dimension; its output dimension
//! is the neuron count.

use serde::{Deserialize, Serialize};

use crate::config::OverflowPolicy;
use crate::error::{GatenetError, Result};
use crate::fixed::FixedPoint;
use crate::vector::Vector;

/// Parameters of one affine neuron
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronWeights {
    /// Weight vector; its dimension is the neuron's input dimension
    pub weight: Vector,
    pub bias: FixedPoint,
}

/// Gradient of a neuron's output with respect to its parameters
///
/// Same shape as [`NeuronWeights`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronGradient {
    pub weight: Vector,
    pub bias: FixedPoint,
}

impl NeuronWeights {
    pub fn new(weight: Vector, bias: FixedPoint) -> Self {
        Self { weight, bias }
    }

    /// Build from plain numbers
    pub fn from_numbers(weight: &[f64], bias: f64) -> Result<Self> {
        Ok(Self {
            weight: Vector::from_numbers(weight)?,
            bias: FixedPoint::from_decimal(bias)?,
        })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.weight.dim()
    }

    /// Gradient descent step: `new = old - learning_rate * gradient`
    pub fn apply_gradient(
        &self,
        gradient: &NeuronGradient,
        learning_rate: FixedPoint,
        policy: OverflowPolicy,
    ) -> Result<NeuronWeights> {
        let weight_step = gradient.weight.scalar_multiply_with(learning_rate, policy)?;
        let bias_step = learning_rate.multiply_with(&gradient.bias, policy)?;
        Ok(Self {
            weight: self.weight.subtract_with(&weight_step, policy)?,
            bias: self.bias.subtract_with(&bias_step, policy)?,
        })
    }
}

impl NeuronGradient {
    /// Chain an upstream scalar gradient through this one
    pub fn scale(&self, factor: FixedPoint, policy: OverflowPolicy) -> Result<NeuronGradient> {
        Ok(Self {
            weight: self.weight.scalar_multiply_with(factor, policy)?,
            bias: factor.multiply_with(&self.bias, policy)?,
        })
    }
}

/// Affine unit: inner product of weights and input, plus bias
pub fn affine(input: &Vector, weights: &NeuronWeights) -> Result<FixedPoint> {
    affine_with(input, weights, OverflowPolicy::Wrap)
}

pub fn affine_with(input: &Vector, weights: &NeuronWeights, policy: OverflowPolicy) -> Result<FixedPoint> {
    weights
        .weight
        .inner_product_with(input, policy)?
        .add_with(&weights.bias, policy)
}

/// Derivative of [`affine`] with respect to its parameters at `input`
///
/// For a linear map this is the input itself (weights) and one (bias).
pub fn affine_derivative(input: &Vector) -> NeuronGradient {
    NeuronGradient {
        weight: input.clone(),
        bias: FixedPoint::ONE,
    }
}

/// Ordered neurons sharing one input dimension
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Layer {
    neurons: Vec<NeuronWeights>,
}

impl Layer {
    /// Validate that the layer is non-empty and every neuron has the same
    /// input dimension
    pub fn new(neurons: Vec<NeuronWeights>) -> Result<Self> {
        let first = neurons.first().ok_or(GatenetError::EmptyLayer)?;
        let dim = first.input_dim();
        if let Some(odd) = neurons.iter().find(|n| n.input_dim() != dim) {
            return Err(GatenetError::DimensionMismatch {
                expected: dim,
                actual: odd.input_dim(),
            });
        }
        Ok(Self { neurons })
    }

    /// Input dimension shared by every neuron
    pub fn input_dim(&self) -> usize {
        self.neurons.first().map(NeuronWeights::input_dim).unwrap_or(0)
    }

    /// Output dimension (neuron count)
    pub fn output_dim(&self) -> usize {
        self.neurons.len()
    }

    pub fn neurons(&self) -> &[NeuronWeights] {
        &self.neurons
    }

    pub fn neuron(&self, index: usize) -> Option<&NeuronWeights> {
        self.neurons.get(index)
    }

    /// Apply every neuron to `input`
    pub fn apply(&self, input: &Vector) -> Result<Vector> {
        self.apply_with(input, OverflowPolicy::Wrap)
    }

    pub fn apply_with(&self, input: &Vector, policy: OverflowPolicy) -> Result<Vector> {
        if input.dim() != self.input_dim() {
            return Err(GatenetError::DimensionMismatch {
                expected: self.input_dim(),
                actual: input.dim(),
            });
        }
        self.neurons
            .iter()
            .map(|neuron| affine_with(input, neuron, policy))
            .collect::<Result<Vec<_>>>()
            .map(Vector::new)
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawLayer {
            neurons: Vec<NeuronWeights>,
        }

        let raw = RawLayer::deserialize(deserializer)?;
        Layer::new(raw.neurons).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(x: f64) -> FixedPoint {
        FixedPoint::from_decimal(x).unwrap()
    }

    fn neuron(weight: &[f64], bias: f64) -> NeuronWeights {
        NeuronWeights::from_numbers(weight, bias).unwrap()
    }

    #[test]
    fn test_affine() {
        let input = Vector::from_numbers(&[1.0, -1.0]).unwrap();
        assert_eq!(affine(&input, &neuron(&[0.5, 1.0], 1.0)).unwrap(), fp(0.5));
        assert_eq!(affine(&input, &neuron(&[-1.0, 2.0], 0.0)).unwrap(), fp(-3.0));
        assert_eq!(affine(&input, &neuron(&[0.5, 1.0], -0.5)).unwrap(), fp(-1.0));
    }

    #[test]
    fn test_affine_dimension_mismatch() {
        let input = Vector::from_numbers(&[1.0]).unwrap();
        assert!(matches!(
            affine(&input, &neuron(&[0.5, 1.0], 1.0)),
            Err(GatenetError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_affine_derivative() {
        let input = Vector::from_numbers(&[2.0, -0.5]).unwrap();
        let grad = affine_derivative(&input);
        assert_eq!(grad.weight, input);
        assert_eq!(grad.bias, FixedPoint::ONE);

        let scaled = grad.scale(fp(-2.0), OverflowPolicy::Wrap).unwrap();
        assert_eq!(scaled.weight, Vector::from_numbers(&[-4.0, 1.0]).unwrap());
        assert_eq!(scaled.bias, fp(-2.0));
    }

    #[test]
    fn test_apply_gradient() {
        let weights = neuron(&[0.5, 1.0], 1.0);
        let gradient = NeuronGradient {
            weight: Vector::from_numbers(&[3.75, -3.75]).unwrap(),
            bias: fp(3.75),
        };
        let updated = weights
            .apply_gradient(&gradient, fp(0.5), OverflowPolicy::Wrap)
            .unwrap();
        assert_eq!(updated, neuron(&[-1.375, 2.875], -0.875));
        // Original untouched
        assert_eq!(weights, neuron(&[0.5, 1.0], 1.0));
    }

    #[test]
    fn test_layer() {
        let layer = Layer::new(vec![
            neuron(&[0.5, 1.0], 1.0),
            neuron(&[-1.0, 2.0], 0.0),
            neuron(&[0.5, 1.0], -0.5),
        ])
        .unwrap();
        assert_eq!(layer.input_dim(), 2);
        assert_eq!(layer.output_dim(), 3);

        let input = Vector::from_numbers(&[1.0, -1.0]).unwrap();
        let output = layer.apply(&input).unwrap();
        assert_eq!(output.to_f64s(), vec![0.5, -3.0, -1.0]);

        let wrong = Vector::from_numbers(&[1.0, -1.0, 0.0]).unwrap();
        assert!(layer.apply(&wrong).is_err());
    }

    #[test]
    fn test_layer_validation() {
        assert_eq!(Layer::new(vec![]).unwrap_err(), GatenetError::EmptyLayer);
        assert_eq!(
            Layer::new(vec![neuron(&[1.0, 2.0], 0.0), neuron(&[1.0], 0.0)]).unwrap_err(),
            GatenetError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_layer_serde_validates() {
        let layer = Layer::new(vec![neuron(&[1.0, 2.0], 0.5)]).unwrap();
        let json = serde_json::to_string(&layer).unwrap();
        let restored: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, layer);

        assert!(serde_json::from_str::<Layer>(r#"{"neurons":[]}"#).is_err());
    }
}
