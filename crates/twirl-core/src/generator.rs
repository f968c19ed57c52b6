//! Twirling set generation.
//!
//! For a two-qubit gate `G` the generator evaluates all 256 assignments of
//! Pauli operators around it and keeps those whose twirled operator equals
//! `G` up to a global phase of 0 or π:
//!
//! ```text
//! C = (post_control ⊗ post_target) · G · (pre_control ⊗ pre_target)
//!
//! ‖C − G‖_F ≈ 0        → phase 0
//! ‖C − G‖_F ≈ 2‖G‖_F   → phase π   (C = −G)
//! otherwise            → rejected
//! ```
//!
//! Tolerances are relative to `‖G‖_F`. Every accepted entry is re-checked by
//! applying its phase correction; a failed check aborts generation for the
//! gate.

use rayon::prelude::*;
use tracing::debug;

use crate::catalogue::{TwoQubitGateSpec, validate_two_qubit_matrix};
use crate::config::TwirlConfig;
use crate::error::{TwirlError, TwirlResult};
use crate::pauli::{PhaseCorrection, TwirlAssignment, TwirlEntry, TwirlingSet};
use crate::unitary::{Matrix, compose_twirl, frobenius_distance, frobenius_norm};

/// Searches the Pauli assignments that leave a gate invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwirlingGenerator {
    tolerance: f64,
    unitarity_tolerance: f64,
    parallel: bool,
}

impl Default for TwirlingGenerator {
    fn default() -> Self {
        Self::new(&TwirlConfig::default())
    }
}

impl TwirlingGenerator {
    /// Create a generator from configuration.
    pub fn new(config: &TwirlConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            unitarity_tolerance: config.unitarity_tolerance,
            parallel: config.parallel,
        }
    }

    /// Set the relative equivalence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable parallel candidate evaluation.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Generate the twirling set of a catalogued gate.
    pub fn generate_spec(&self, spec: &TwoQubitGateSpec) -> TwirlResult<TwirlingSet> {
        self.generate(spec.name(), spec.matrix())
    }

    /// Generate the twirling set of `matrix`, labelled `gate`.
    ///
    /// The result lists accepted assignments in lexicographic order of
    /// (pre_control, pre_target, post_control, post_target), whether or not
    /// the search runs in parallel.
    pub fn generate(&self, gate: &str, matrix: &Matrix) -> TwirlResult<TwirlingSet> {
        validate_two_qubit_matrix(gate, matrix, self.unitarity_tolerance)?;

        let scale = frobenius_norm(matrix.view());
        let tolerance = self.tolerance * scale;
        let evaluate = |index: usize| {
            self.evaluate(gate, matrix, TwirlAssignment::from_index(index), scale, tolerance)
        };

        let candidates: Vec<Option<TwirlEntry>> = if self.parallel {
            (0..TwirlAssignment::COUNT)
                .into_par_iter()
                .map(evaluate)
                .collect::<TwirlResult<_>>()?
        } else {
            (0..TwirlAssignment::COUNT)
                .map(evaluate)
                .collect::<TwirlResult<_>>()?
        };

        let entries: Vec<TwirlEntry> = candidates.into_iter().flatten().collect();
        let phase_pi = entries
            .iter()
            .filter(|e| e.phase == PhaseCorrection::Pi)
            .count();
        debug!(
            gate,
            accepted = entries.len(),
            phase_pi,
            "Generated twirling set"
        );

        TwirlingSet::new(gate, entries)
    }

    fn evaluate(
        &self,
        gate: &str,
        matrix: &Matrix,
        assignment: TwirlAssignment,
        scale: f64,
        tolerance: f64,
    ) -> TwirlResult<Option<TwirlEntry>> {
        let composed = compose_twirl(matrix, &assignment);
        let distance = frobenius_distance(&composed, matrix);

        let phase = if distance <= tolerance {
            PhaseCorrection::Zero
        } else if (distance - 2.0 * scale).abs() <= tolerance {
            PhaseCorrection::Pi
        } else {
            return Ok(None);
        };

        let factor = phase.factor();
        let residual = frobenius_distance(&composed.mapv(|z| z * factor), matrix);
        if residual > tolerance {
            return Err(TwirlError::EquivalenceVerification {
                gate: gate.to_string(),
                assignment,
                residual,
            });
        }

        Ok(Some(TwirlEntry { assignment, phase }))
    }
}

/// Generate the twirling set of `matrix` with default settings.
pub fn generate(gate: &str, matrix: &Matrix) -> TwirlResult<TwirlingSet> {
    TwirlingGenerator::default().generate(gate, matrix)
}
