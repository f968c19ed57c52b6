//! Twirl Pauli Twirling Engine
//!
//! This crate computes Pauli twirling sets for two-qubit gates and applies
//! randomized twirling to circuits built with `twirl-ir`.
//!
//! # Overview
//!
//! Twirling a gate `G` surrounds it with single-qubit Pauli operators chosen
//! so that the sandwich still implements `G`, up to a global phase of 0 or π.
//! Drawing a fresh sandwich for every occurrence turns coherent errors into
//! stochastic Pauli noise while leaving the ideal circuit unchanged.
//!
//! # Architecture
//!
//! ```text
//! GateCatalogue ──► TwirlingGenerator ──► TwirlingRegistry ──► JSON file
//!                                               │
//!                                               ▼
//! Circuit ──► CircuitDag ──► Twirler / PassManager ──► twirled CircuitDag
//! ```
//!
//! # Example: Twirling a Bell Circuit
//!
//! ```rust
//! use twirl_core::{GateCatalogue, TwirlConfig, TwirlingRegistry, substitute_from_registry};
//! use twirl_ir::Circuit;
//!
//! let catalogue = GateCatalogue::standard().select(&["cx"]).unwrap();
//! let registry = TwirlingRegistry::build(&catalogue, &TwirlConfig::default()).unwrap();
//! assert_eq!(registry.get("cx").unwrap().len(), 16);
//!
//! let mut circuit = Circuit::bell().unwrap();
//! substitute_from_registry(circuit.dag_mut(), "cx", &registry, Some(7)).unwrap();
//!
//! // h, the cx sandwiched between four Paulis, two measurements.
//! assert_eq!(circuit.dag().num_ops(), 8);
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to run extra analyses or rewrites next to the
//! twirling passes in a [`PassManager`]:
//!
//! ```rust
//! use twirl_core::{Pass, PassKind, TwirlResult};
//! use twirl_ir::CircuitDag;
//!
//! struct CountCx;
//!
//! impl Pass for CountCx {
//!     fn name(&self) -> &str { "count_cx" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, dag: &mut CircuitDag) -> TwirlResult<()> {
//!         tracing::info!(cx = dag.ops_named("cx").len(), "Counted");
//!         Ok(())
//!     }
//! }
//! ```

pub mod catalogue;
pub mod config;
pub mod error;
pub mod generator;
pub mod manager;
pub mod pass;
pub mod pauli;
pub mod registry;
pub mod substitution;
pub mod unitary;

pub use catalogue::{
    GateCatalogue, STANDARD_TWIRL_GATES, TwoQubitGateSpec, gate_matrix, standard_gate_matrix,
};
pub use config::{ConfigError, TwirlConfig};
pub use error::{TwirlError, TwirlResult};
pub use generator::{TwirlingGenerator, generate};
pub use manager::PassManager;
pub use pass::{IntegrityCheck, Pass, PassKind, PauliTwirlPass};
pub use pauli::{Pauli, PhaseCorrection, TwirlAssignment, TwirlEntry, TwirlingSet};
pub use registry::TwirlingRegistry;
pub use substitution::{SubstitutionReport, Twirler, substitute, substitute_from_registry};
pub use unitary::{Matrix, circuit_unitary};
