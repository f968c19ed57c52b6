//! Twirl Circuit Intermediate Representation
//!
//! This crate provides the circuit model that the twirling engine rewrites:
//! qubit and classical-bit identifiers, gates, instructions, a DAG and a
//! high-level builder.
//!
//! # Overview
//!
//! Circuits are stored as a DAG (Directed Acyclic Graph) whose edges are wire
//! segments. The DAG exposes exactly what a rewriting pass needs:
//!
//! - deterministic enumeration of operations ([`CircuitDag::topological_ops`],
//!   [`CircuitDag::ops_named`]),
//! - in-place replacement of one operation by a sub-sequence
//!   ([`CircuitDag::substitute_node`]),
//! - an accumulated global phase ([`CircuitDag::add_global_phase`]).
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use twirl_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.dag().ops_named("cx").len(), 1);
//! ```
//!
//! # Wire convention
//!
//! For every two-qubit gate the first operand is the control (wire 0 of the
//! gate) and the second the target (wire 1). Matrices built from a circuit
//! are big-endian: qubit 0 is the most significant bit of a basis index.
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id`, `x`, `y`, `z` | 1 | Pauli gates |
//! | `h`, `s`, `sdg`, `t`, `tdg`, `sx`, `sxdg` | 1 | Single-qubit Cliffords and T |
//! | `cx`, `cy`, `cz`, `ch` | 2 | Controlled Paulis and controlled Hadamard |
//! | `cs`, `csdg`, `csx` | 2 | Controlled S, S-dagger and sqrt(X) |
//! | `dcx` | 2 | Double CNOT |
//! | `ecr` | 2 | Echoed cross-resonance |
//! | `swap`, `iswap` | 2 | SWAP and iSWAP |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, CircuitSnapshot};
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
