//! Boolean Logic - the primitive gates everything else is built from
//!
//! Every arithmetic operation in this crate bottoms out in these four gates
//! and the full adder composed from them. No host integer arithmetic is used
//! below the conversion boundary.

/// Logical NOT
#[inline]
pub const fn not(a: bool) -> bool {
    !a
}

/// Logical AND
#[inline]
pub const fn and(a: bool, b: bool) -> bool {
    a && b
}

/// Logical OR
#[inline]
pub const fn or(a: bool, b: bool) -> bool {
    a || b
}

/// Exclusive OR, composed from the other gates
#[inline]
pub const fn xor(a: bool, b: bool) -> bool {
    and(or(a, b), not(and(a, b)))
}

/// Output of a one-bit full adder
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FullAdderOutput {
    /// a ⊕ b ⊕ carry_in
    pub sum: bool,
    /// majority(a, b, carry_in)
    pub carry: bool,
}

/// One-bit full adder
///
/// `sum` is the parity of the three inputs, `carry` is true iff at least
/// two of them are true.
///
/// # Example
/// ```
/// use gatenet::logic::full_adder;
///
/// let out = full_adder(true, true, false);
/// assert!(!out.sum);
/// assert!(out.carry);
/// ```
#[inline]
pub const fn full_adder(a: bool, b: bool, carry_in: bool) -> FullAdderOutput {
    let partial = xor(a, b);
    FullAdderOutput {
        sum: xor(partial, carry_in),
        carry: or(and(a, b), and(partial, carry_in)),
    }
}
