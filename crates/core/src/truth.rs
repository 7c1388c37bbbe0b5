//! Truth and attention values attached to every atom.

/// Probabilistic truth value: `(strength, confidence)`, each clamped to
/// `[0, 1]` on assignment. Default is `(1.0, 0.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruthValue {
    /// Probability that the atom's proposition holds.
    pub strength: f64,
    /// Confidence in `strength`.
    pub confidence: f64,
}

impl Default for TruthValue {
    fn default() -> Self {
        TruthValue {
            strength: 1.0,
            confidence: 0.0,
        }
    }
}

impl TruthValue {
    /// Construct a truth value, clamping both components to `[0, 1]`.
    pub fn new(strength: f64, confidence: f64) -> Self {
        TruthValue {
            strength: strength.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// True if either component was supplied outside `[0, 1]` and would
    /// be clamped by [`TruthValue::new`]. Callers use this to decide
    /// whether to reject the assignment with `InvalidArgument` rather
    /// than silently clamp.
    pub fn is_out_of_range(strength: f64, confidence: f64) -> bool {
        !(0.0..=1.0).contains(&strength) || !(0.0..=1.0).contains(&confidence)
    }
}

/// Attention value: short-, long-, and very-long-term importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttentionValue {
    /// Short-term importance.
    pub sti: i16,
    /// Long-term importance.
    pub lti: i16,
    /// Very-long-term importance.
    pub vlti: i16,
}

impl AttentionValue {
    /// Construct an attention value from its three components.
    pub fn new(sti: i16, lti: i16, vlti: i16) -> Self {
        AttentionValue { sti, lti, vlti }
    }
}
