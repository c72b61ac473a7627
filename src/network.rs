//! Network Forward/Backward Pass
//!
//! Fixed topology: input → affine hidden layer → ReLU → one linear output
//! neuron → scalar prediction.
//!
//! Gradients are derived by hand for this topology and squared error:
//!
//! ```text
//! g            = -2 · (target - predicted)
//! ∂/∂out.w     = g · h             ∂/∂out.b     = g
//! s_i          = g · out.w_i · relu'(z_i)
//! ∂/∂hidden_i.w = s_i · input      ∂/∂hidden_i.b = s_i
//! ```
//!
//! Every gradient is computed from the pre-update weights; the update is a
//! single gradient descent step `new = old - learning_rate · gradient`.

use serde::{Deserialize, Serialize};

use crate::config::{OverflowPolicy, TrainingConfig};
use crate::error::{GatenetError, Result};
use crate::fixed::FixedPoint;
use crate::neuron::{affine_derivative, affine_with, Layer, NeuronGradient, NeuronWeights};
use crate::vector::Vector;

/// Weights of the two-layer network
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NetworkWeights {
    input_to_hidden: Layer,
    hidden_to_output: NeuronWeights,
}

/// Hand-derived gradients for every parameter of [`NetworkWeights`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gradients {
    /// One gradient per hidden neuron, in layer order
    pub hidden: Vec<NeuronGradient>,
    pub output: NeuronGradient,
}

impl NetworkWeights {
    /// The output neuron must take one input per hidden neuron
    pub fn new(input_to_hidden: Layer, hidden_to_output: NeuronWeights) -> Result<Self> {
        if hidden_to_output.input_dim() != input_to_hidden.output_dim() {
            return Err(GatenetError::DimensionMismatch {
                expected: input_to_hidden.output_dim(),
                actual: hidden_to_output.input_dim(),
            });
        }
        Ok(Self {
            input_to_hidden,
            hidden_to_output,
        })
    }

    pub fn input_to_hidden(&self) -> &Layer {
        &self.input_to_hidden
    }

    pub fn hidden_to_output(&self) -> &NeuronWeights {
        &self.hidden_to_output
    }

    pub fn input_dim(&self) -> usize {
        self.input_to_hidden.input_dim()
    }

    pub fn hidden_dim(&self) -> usize {
        self.input_to_hidden.output_dim()
    }

    /// Gradient descent step over every weight/bias pair
    pub fn apply_gradients(
        &self,
        gradients: &Gradients,
        learning_rate: FixedPoint,
        policy: OverflowPolicy,
    ) -> Result<NetworkWeights> {
        if gradients.hidden.len() != self.hidden_dim() {
            return Err(GatenetError::DimensionMismatch {
                expected: self.hidden_dim(),
                actual: gradients.hidden.len(),
            });
        }

        let hidden = self
            .input_to_hidden
            .neurons()
            .iter()
            .zip(&gradients.hidden)
            .map(|(neuron, gradient)| neuron.apply_gradient(gradient, learning_rate, policy))
            .collect::<Result<Vec<_>>>()?;
        let output = self
            .hidden_to_output
            .apply_gradient(&gradients.output, learning_rate, policy)?;

        Self::new(Layer::new(hidden)?, output)
    }
}

impl<'de> Deserialize<'de> for NetworkWeights {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawWeights {
            input_to_hidden: Layer,
            hidden_to_output: NeuronWeights,
        }

        let raw = RawWeights::deserialize(deserializer)?;
        NetworkWeights::new(raw.input_to_hidden, raw.hidden_to_output).map_err(serde::de::Error::custom)
    }
}

/// Elementwise `max(0, x)`
pub fn relu(v: &Vector) -> Vector {
    v.iter()
        .map(|x| if x.is_positive() { *x } else { FixedPoint::ZERO })
        .collect()
}

/// 1 for positive input, 0 otherwise
pub fn relu_derivative(x: FixedPoint) -> FixedPoint {
    if x.is_positive() {
        FixedPoint::ONE
    } else {
        FixedPoint::ZERO
    }
}

/// `(target - predicted)²`
pub fn squared_error(predicted: FixedPoint, target: FixedPoint) -> FixedPoint {
    let diff = target.subtract(&predicted);
    diff.multiply(&diff)
}

/// Derivative of squared error with respect to the prediction:
/// `-2 · (target - predicted)`
pub fn squared_error_derivative(predicted: FixedPoint, target: FixedPoint) -> FixedPoint {
    FixedPoint::MINUS_TWO.multiply(&target.subtract(&predicted))
}

pub fn squared_error_derivative_with(
    predicted: FixedPoint,
    target: FixedPoint,
    policy: OverflowPolicy,
) -> Result<FixedPoint> {
    let diff = target.subtract_with(&predicted, policy)?;
    FixedPoint::MINUS_TWO.multiply_with(&diff, policy)
}

/// Prediction for `input`
pub fn forward_pass(input: &Vector, weights: &NetworkWeights) -> Result<FixedPoint> {
    forward_pass_with(input, weights, OverflowPolicy::Wrap)
}

pub fn forward_pass_with(input: &Vector, weights: &NetworkWeights, policy: OverflowPolicy) -> Result<FixedPoint> {
    let hidden = relu(&weights.input_to_hidden.apply_with(input, policy)?);
    let predicted = affine_with(&hidden, &weights.hidden_to_output, policy)?;
    log::debug!("forward: hidden={:?} predicted={}", hidden.to_f64s(), predicted);
    Ok(predicted)
}

/// Hand-derived gradients of squared error at one sample
pub fn gradients(
    input: &Vector,
    target: FixedPoint,
    weights: &NetworkWeights,
    policy: OverflowPolicy,
) -> Result<Gradients> {
    let predicted = forward_pass_with(input, weights, policy)?;
    let g = squared_error_derivative_with(predicted, target, policy)?;

    let pre_activation = weights.input_to_hidden.apply_with(input, policy)?;
    let hidden = relu(&pre_activation);

    let output = affine_derivative(&hidden).scale(g, policy)?;

    let output_weights = &weights.hidden_to_output.weight;
    let input_derivative = affine_derivative(input);
    let hidden_gradients = pre_activation
        .iter()
        .zip(output_weights.iter())
        .enumerate()
        .map(|(i, (z, w))| {
            let local = g.multiply_with(w, policy)?.multiply_with(&relu_derivative(*z), policy)?;
            log::trace!("hidden unit {}: z={} w={} local={}", i, z, w, local);
            input_derivative.scale(local, policy)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "gradients: predicted={} target={} g={} output.bias={}",
        predicted,
        target,
        g,
        output.bias
    );

    Ok(Gradients {
        hidden: hidden_gradients,
        output,
    })
}

/// One gradient descent step; returns the updated weights
///
/// The forward pass is not rerun on the result: call [`forward_pass`] again
/// to observe the new prediction.
pub fn backward_pass(
    input: &Vector,
    target: FixedPoint,
    weights: &NetworkWeights,
    learning_rate: FixedPoint,
) -> Result<NetworkWeights> {
    backward_pass_with(input, target, weights, learning_rate, OverflowPolicy::Wrap)
}

pub fn backward_pass_with(
    input: &Vector,
    target: FixedPoint,
    weights: &NetworkWeights,
    learning_rate: FixedPoint,
    policy: OverflowPolicy,
) -> Result<NetworkWeights> {
    let gradients = gradients(input, target, weights, policy)?;
    weights.apply_gradients(&gradients, learning_rate, policy)
}

/// Forward and backward passes driven by a [`TrainingConfig`]
#[derive(Debug, Clone)]
pub struct NetworkTrainer {
    config: TrainingConfig,
    learning_rate: FixedPoint,
}

impl NetworkTrainer {
    /// Validates the config up front
    pub fn new(config: TrainingConfig) -> Result<Self> {
        let learning_rate = config.learning_rate()?;
        Ok(Self {
            config,
            learning_rate,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn predict(&self, input: &Vector, weights: &NetworkWeights) -> Result<FixedPoint> {
        forward_pass_with(input, weights, self.config.overflow)
    }

    pub fn gradients(&self, input: &Vector, target: FixedPoint, weights: &NetworkWeights) -> Result<Gradients> {
        gradients(input, target, weights, self.config.overflow)
    }

    /// Single gradient descent step
    pub fn step(&self, input: &Vector, target: FixedPoint, weights: &NetworkWeights) -> Result<NetworkWeights> {
        backward_pass_with(input, target, weights, self.learning_rate, self.config.overflow)
    }
}

/// Two-input, three-hidden-unit example network
///
/// Predicts 0.25 on [`demo_input`]; one step toward 4 at rate 0.5 moves the
/// prediction to 4.25.
pub fn demo_weights() -> Result<NetworkWeights> {
    let hidden = Layer::new(vec![
        NeuronWeights::from_numbers(&[0.5, 1.0], 1.0)?,
        NeuronWeights::from_numbers(&[-1.0, 2.0], 0.0)?,
        NeuronWeights::from_numbers(&[0.5, 1.0], -0.5)?,
    ])?;
    let output = NeuronWeights::from_numbers(&[-0.5, 1.0, 0.25], 0.5)?;
    NetworkWeights::new(hidden, output)
}

/// Input `[1, -1]` for [`demo_weights`]
pub fn demo_input() -> Result<Vector> {
    Vector::from_numbers(&[1.0, -1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(x: f64) -> FixedPoint {
        FixedPoint::from_decimal(x).unwrap()
    }

    fn vec_of(xs: &[f64]) -> Vector {
        Vector::from_numbers(xs).unwrap()
    }

    #[test]
    fn test_relu() {
        let v = vec_of(&[0.5, -3.0, 0.0, 2.0]);
        assert_eq!(relu(&v), vec_of(&[0.5, 0.0, 0.0, 2.0]));
        assert_eq!(relu_derivative(fp(0.125)), FixedPoint::ONE);
        assert_eq!(relu_derivative(fp(0.0)), FixedPoint::ZERO);
        assert_eq!(relu_derivative(fp(-1.0)), FixedPoint::ZERO);
    }

    #[test]
    fn test_squared_error() {
        assert_eq!(squared_error_derivative(fp(0.25), fp(4.0)), fp(-7.5));
        assert_eq!(squared_error_derivative(fp(4.0), fp(4.0)), FixedPoint::ZERO);
        assert_eq!(squared_error_derivative(fp(1.0), fp(0.5)), fp(1.0));
        assert_eq!(squared_error(fp(1.0), fp(3.0)), fp(4.0));
    }

    #[test]
    fn test_network_validation() {
        let hidden = Layer::new(vec![NeuronWeights::from_numbers(&[1.0], 0.0).unwrap()]).unwrap();
        let output = NeuronWeights::from_numbers(&[1.0, 1.0], 0.0).unwrap();
        assert_eq!(
            NetworkWeights::new(hidden, output).unwrap_err(),
            GatenetError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_demo_forward() {
        let weights = demo_weights().unwrap();
        let input = demo_input().unwrap();
        assert_eq!(weights.input_dim(), 2);
        assert_eq!(weights.hidden_dim(), 3);
        assert_eq!(forward_pass(&input, &weights).unwrap(), fp(0.25));
    }

    #[test]
    fn test_demo_gradients() {
        let weights = demo_weights().unwrap();
        let input = demo_input().unwrap();
        let grads = gradients(&input, fp(4.0), &weights, OverflowPolicy::Wrap).unwrap();

        assert_eq!(grads.output.weight, vec_of(&[-3.75, 0.0, 0.0]));
        assert_eq!(grads.output.bias, fp(-7.5));

        // Only the first hidden unit is active
        assert_eq!(grads.hidden[0].weight, vec_of(&[3.75, -3.75]));
        assert_eq!(grads.hidden[0].bias, fp(3.75));
        for inactive in &grads.hidden[1..] {
            assert_eq!(inactive.weight, Vector::zeros(2));
            assert_eq!(inactive.bias, FixedPoint::ZERO);
        }
    }

    #[test]
    fn test_demo_backward() {
        let weights = demo_weights().unwrap();
        let input = demo_input().unwrap();
        let updated = backward_pass(&input, fp(4.0), &weights, fp(0.5)).unwrap();

        assert_eq!(
            updated.hidden_to_output(),
            &NeuronWeights::from_numbers(&[1.375, 1.0, 0.25], 4.25).unwrap()
        );
        assert_eq!(
            updated.input_to_hidden().neuron(0).unwrap(),
            &NeuronWeights::from_numbers(&[-1.375, 2.875], -0.875).unwrap()
        );
        assert_eq!(updated.input_to_hidden().neuron(1), weights.input_to_hidden().neuron(1));
        assert_eq!(updated.input_to_hidden().neuron(2), weights.input_to_hidden().neuron(2));

        assert_eq!(forward_pass(&input, &updated).unwrap(), fp(4.25));
        // Original weights untouched
        assert_eq!(forward_pass(&input, &weights).unwrap(), fp(0.25));
    }

    #[test]
    fn test_apply_gradients_shape() {
        let weights = demo_weights().unwrap();
        let input = demo_input().unwrap();
        let mut grads = gradients(&input, fp(4.0), &weights, OverflowPolicy::Wrap).unwrap();
        grads.hidden.pop();
        assert!(matches!(
            weights.apply_gradients(&grads, fp(0.5), OverflowPolicy::Wrap),
            Err(GatenetError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_trainer() {
        let trainer = NetworkTrainer::new(TrainingConfig::strict()).unwrap();
        let weights = demo_weights().unwrap();
        let input = demo_input().unwrap();

        let updated = trainer.step(&input, fp(4.0), &weights).unwrap();
        assert_eq!(trainer.predict(&input, &updated).unwrap(), fp(4.25));

        assert!(NetworkTrainer::new(TrainingConfig::default().with_learning_rate(0.1)).is_err());
    }

    #[test]
    fn test_strict_policy_reports_overflow() {
        let weights = demo_weights().unwrap();
        let input = demo_input().unwrap();
        // -2 * (15 - 0.25) = -29.5 does not fit
        let err = backward_pass_with(&input, fp(15.0), &weights, fp(0.5), OverflowPolicy::Error).unwrap_err();
        assert!(matches!(err, GatenetError::Overflow { .. }));
    }

    #[test]
    fn test_weights_serde_validates() {
        let weights = demo_weights().unwrap();
        let json = serde_json::to_string(&weights).unwrap();
        let restored: NetworkWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, weights);
    }
}
