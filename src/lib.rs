//! # Gatenet - Arithmetic From Gates Up
//!
//! A complete numeric stack built from four boolean gates, ending in a
//! two-layer neural network with a hand-derived backward pass. No host
//! arithmetic is used between the gates and the network; host numbers only
//! appear at the conversion boundary.
//!
//! ## Layers (leaves first)
//!
//! 1. **Logic**: NOT, AND, OR, XOR and the full adder
//! 2. **BitSequence**: ripple-carry addition, shifts, shift-and-add multiplication
//! 3. **SignedByte**: 8-bit two's complement (negate, compare, place-value encoding)
//! 4. **FixedPoint**: a SignedByte read in eighths, range [-16, 15.875]
//! 5. **Vector**: elementwise algebra and inner product
//! 6. **Neuron / Layer**: affine units and their parameter derivative
//! 7. **Network**: hidden layer → ReLU → linear output; one gradient step
//!
//! Data flows strictly upward; every value is immutable and every operation
//! returns a new value.
//!
//! ## Design Principles
//!
//! - **Fixed width**: results wrap to 8 bits, never widen
//! - **Explicit failure**: unrepresentable inputs are `GatenetError::Representability`,
//!   never a corrupted bit pattern
//! - **Overflow is a policy**: silent wrap by default, `Saturate` or `Error` on request
//!
//! ## Example
//!
//! ```
//! use gatenet::{backward_pass, demo_input, demo_weights, forward_pass, FixedPoint};
//!
//! let weights = demo_weights()?;
//! let input = demo_input()?;
//! assert_eq!(forward_pass(&input, &weights)?.to_f64(), 0.25);
//!
//! let target = FixedPoint::from_decimal(4.0)?;
//! let rate = FixedPoint::from_decimal(0.5)?;
//! let updated = backward_pass(&input, target, &weights, rate)?;
//! assert_eq!(forward_pass(&input, &updated)?.to_f64(), 4.25);
//! # Ok::<(), gatenet::GatenetError>(())
//! ```

// Gates
pub mod logic;
pub use logic::{full_adder, FullAdderOutput};

// Unsigned bit arithmetic
pub mod bits;
pub use bits::{BitSequence, BitSum};

// Two's-complement bytes
pub mod signed;
pub use signed::SignedByte;

// Eighths fixed point
pub mod fixed;
pub use fixed::FixedPoint;

// Vector algebra
pub mod vector;
pub use vector::Vector;

// Affine neurons and layers
pub mod neuron;
pub use neuron::{affine, affine_derivative, Layer, NeuronGradient, NeuronWeights};

// Forward/backward passes
pub mod network;
pub use network::{
    backward_pass, demo_input, demo_weights, forward_pass, gradients, relu, relu_derivative,
    squared_error, squared_error_derivative, Gradients, NetworkTrainer, NetworkWeights,
};

// Overflow policy and training parameters
pub mod config;
pub use config::{OverflowPolicy, TrainingConfig};

// Structural equality checks
pub mod check;
pub use check::{assert_equal, check_equal};

// Error types
mod error;
pub use error::{GatenetError, Result};
