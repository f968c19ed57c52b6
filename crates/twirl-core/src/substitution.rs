//! Randomized twirl substitution.
//!
//! Every occurrence of the target gate is replaced, in place, by
//!
//! ```text
//! pre_control(c) · pre_target(t) · gate(c, t) · post_control(c) · post_target(t)
//! ```
//!
//! with the entry drawn uniformly from the gate's twirling set, and the
//! entry's phase correction is added to the circuit's global phase.
//!
//! # Reproducibility
//!
//! A [`Twirler`] draws exactly one index per occurrence, visiting occurrences
//! in the traversal order of [`CircuitDag::ops_named`]. That order depends
//! only on the instruction sequence, not on how the DAG was built, so a
//! fixed seed gives the same result for any two circuits with equal
//! snapshots. Seeded twirlers use [`StdRng`], so this holds for a fixed
//! version of `rand`. Unseeded twirlers draw their seed from OS entropy and
//! are not reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use twirl_ir::{CircuitDag, Instruction, NodeIndex};

use crate::error::{TwirlError, TwirlResult};
use crate::pauli::TwirlingSet;
use crate::registry::TwirlingRegistry;

/// What one substitution call did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionReport {
    /// The twirled gate.
    pub gate: String,
    /// Number of occurrences replaced.
    pub twirled: usize,
    /// Index drawn for each occurrence, in traversal order.
    pub choices: Vec<usize>,
    /// Total phase added to the circuit, in radians (before wrapping).
    pub phase_added: f64,
}

/// A substitution context owning one random number generator.
#[derive(Debug, Clone)]
pub struct Twirler<R: Rng = StdRng> {
    rng: R,
}

impl Twirler<StdRng> {
    /// A reproducible twirler.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// A twirler seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Seeded when `seed` is given, from entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> Twirler<R> {
    /// A twirler drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Consume the twirler and return its generator.
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Twirl every `gate_name` operation in `dag`.
    ///
    /// Fails before touching the circuit if `set` belongs to another gate,
    /// if it is empty, or if any matching operation is not a two-qubit gate.
    pub fn substitute(
        &mut self,
        dag: &mut CircuitDag,
        gate_name: &str,
        set: &TwirlingSet,
    ) -> TwirlResult<SubstitutionReport> {
        if set.gate() != gate_name {
            return Err(TwirlError::UnknownGate {
                name: gate_name.to_string(),
                known: vec![set.gate().to_string()],
            });
        }
        if set.is_empty() {
            return Err(TwirlError::EmptyTwirlingSet(gate_name.to_string()));
        }

        let targets = collect_targets(dag, gate_name)?;
        let mut report = SubstitutionReport {
            gate: gate_name.to_string(),
            twirled: 0,
            choices: Vec::with_capacity(targets.len()),
            phase_added: 0.0,
        };

        for (node, original) in targets {
            let choice = self.rng.gen_range(0..set.len());
            let entry = set.entries()[choice];
            let a = entry.assignment;
            let (control, target) = (original.qubits[0], original.qubits[1]);

            dag.substitute_node(
                node,
                [
                    Instruction::single_qubit_gate(a.pre_control.gate(), control),
                    Instruction::single_qubit_gate(a.pre_target.gate(), target),
                    original,
                    Instruction::single_qubit_gate(a.post_control.gate(), control),
                    Instruction::single_qubit_gate(a.post_target.gate(), target),
                ],
            )?;
            dag.add_global_phase(entry.phase.radians());

            debug!(gate = gate_name, choice, assignment = %a, phase = %entry.phase, "Twirled gate");
            report.twirled += 1;
            report.choices.push(choice);
            report.phase_added += entry.phase.radians();
        }

        info!(
            gate = gate_name,
            twirled = report.twirled,
            set_size = set.len(),
            "Applied Pauli twirling"
        );
        Ok(report)
    }
}

/// Matching operations and their instructions, checked to be two-qubit gates.
fn collect_targets(
    dag: &CircuitDag,
    gate_name: &str,
) -> TwirlResult<Vec<(NodeIndex, Instruction)>> {
    dag.ops_named(gate_name)
        .into_iter()
        .map(|node| {
            let inst = dag
                .get_instruction(node)
                .ok_or(TwirlError::Ir(twirl_ir::IrError::InvalidNode))?;
            if inst.qubits.len() != 2 {
                return Err(TwirlError::InvalidGate {
                    name: gate_name.to_string(),
                    reason: format!("acts on {} qubits, expected 2", inst.qubits.len()),
                });
            }
            Ok((node, inst.clone()))
        })
        .collect()
}

/// Twirl every `gate_name` operation in `dag` with a fresh twirler.
///
/// Returns `dag` for chaining.
pub fn substitute<'a>(
    dag: &'a mut CircuitDag,
    gate_name: &str,
    set: &TwirlingSet,
    seed: Option<u64>,
) -> TwirlResult<&'a mut CircuitDag> {
    Twirler::new(seed).substitute(dag, gate_name, set)?;
    Ok(dag)
}

/// Look up `gate_name` in `registry`, then twirl it.
///
/// An unknown gate fails before the circuit is touched.
pub fn substitute_from_registry<'a>(
    dag: &'a mut CircuitDag,
    gate_name: &str,
    registry: &TwirlingRegistry,
    seed: Option<u64>,
) -> TwirlResult<&'a mut CircuitDag> {
    let set = registry.get(gate_name)?;
    substitute(dag, gate_name, set, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::standard_gate_matrix;
    use crate::generator::generate;
    use crate::pauli::{PhaseCorrection, TwirlAssignment, TwirlEntry};
    use twirl_ir::{Circuit, CustomGate, Gate, QubitId, StandardGate};

    fn cx_set() -> TwirlingSet {
        generate("cx", &standard_gate_matrix(StandardGate::CX)).unwrap()
    }

    fn names(dag: &CircuitDag) -> Vec<String> {
        dag.topological_ops()
            .map(|(_, inst)| inst.name().to_string())
            .collect()
    }

    #[test]
    fn test_substitute_builds_sandwich() {
        let mut circuit = Circuit::with_size("one", 2, 0);
        circuit.cx(QubitId(1), QubitId(0)).unwrap();

        let report = Twirler::seeded(3)
            .substitute(circuit.dag_mut(), "cx", &cx_set())
            .unwrap();
        assert_eq!(report.twirled, 1);
        assert_eq!(report.choices.len(), 1);

        let ops = circuit.dag().instructions();
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[2].name(), "cx");
        // Wire binding: pre/post control on qubit 1, target on qubit 0.
        assert_eq!(ops[0].qubits, vec![QubitId(1)]);
        assert_eq!(ops[1].qubits, vec![QubitId(0)]);
        assert_eq!(ops[2].qubits, vec![QubitId(1), QubitId(0)]);
        assert_eq!(ops[3].qubits, vec![QubitId(1)]);
        assert_eq!(ops[4].qubits, vec![QubitId(0)]);
    }

    #[test]
    fn test_single_entry_set_is_deterministic() {
        let set = TwirlingSet::new(
            "cx",
            vec![TwirlEntry {
                assignment: "YYXZ".parse().unwrap(),
                phase: PhaseCorrection::Pi,
            }],
        )
        .unwrap();

        let mut circuit = Circuit::with_size("two", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let report = Twirler::from_entropy()
            .substitute(circuit.dag_mut(), "cx", &set)
            .unwrap();

        assert_eq!(report.choices, vec![0]);
        assert_eq!(names(circuit.dag()), vec!["h", "y", "y", "cx", "x", "z"]);
        assert!((circuit.global_phase() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set_rejected() {
        let empty = TwirlingSet::new("cx", vec![]).unwrap();
        let mut circuit = Circuit::with_size("e", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let before = circuit.snapshot();

        let result = substitute(circuit.dag_mut(), "cx", &empty, Some(1));
        assert!(matches!(result, Err(TwirlError::EmptyTwirlingSet(_))));
        assert_eq!(circuit.snapshot(), before);
    }

    #[test]
    fn test_mismatched_set_rejected() {
        let mut circuit = Circuit::with_size("m", 2, 0);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        let before = circuit.snapshot();

        let result = substitute(circuit.dag_mut(), "cz", &cx_set(), Some(1));
        assert!(matches!(result, Err(TwirlError::UnknownGate { .. })));
        assert_eq!(circuit.snapshot(), before);
    }

    #[test]
    fn test_non_two_qubit_match_rejected_before_mutation() {
        let three = Gate::custom(CustomGate::new("cx", 3));
        let mut circuit = Circuit::with_size("w", 3, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit
            .gate(three, [QubitId(0), QubitId(1), QubitId(2)])
            .unwrap();
        let before = circuit.snapshot();

        let result = substitute(circuit.dag_mut(), "cx", &cx_set(), Some(1));
        assert!(matches!(result, Err(TwirlError::InvalidGate { .. })));
        assert_eq!(circuit.snapshot(), before);
    }

    #[test]
    fn test_no_matches_is_a_no_op() {
        let mut circuit = Circuit::with_size("n", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        let report = Twirler::seeded(0)
            .substitute(circuit.dag_mut(), "cx", &cx_set())
            .unwrap();
        assert_eq!(report.twirled, 0);
        assert_eq!(names(circuit.dag()), vec!["h"]);
    }

    #[test]
    fn test_seeded_choices_repeat() {
        let set = cx_set();
        let run = || {
            let mut circuit = Circuit::ghz(6).unwrap();
            Twirler::seeded(42)
                .substitute(circuit.dag_mut(), "cx", &set)
                .unwrap()
                .choices
        };
        let first = run();
        assert_eq!(first.len(), 5);
        assert_eq!(first, run());
        assert!(first.iter().all(|&c| c < set.len()));
    }

    #[test]
    fn test_identity_assignment_inserts_explicit_identities() {
        let set = TwirlingSet::new(
            "cx",
            vec![TwirlEntry {
                assignment: TwirlAssignment::identity(),
                phase: PhaseCorrection::Zero,
            }],
        )
        .unwrap();
        let mut circuit = Circuit::with_size("i", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        substitute(circuit.dag_mut(), "cx", &set, None).unwrap();
        assert_eq!(names(circuit.dag()), vec!["id", "id", "cx", "id", "id"]);
        assert_eq!(circuit.global_phase(), 0.0);
    }
}
