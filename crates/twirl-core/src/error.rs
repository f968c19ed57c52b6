//! Error types for the twirling crate.

use thiserror::Error;

use crate::config::ConfigError;
use crate::pauli::TwirlAssignment;

/// Errors that can occur while generating or applying twirls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TwirlError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] twirl_ir::IrError),

    /// Malformed or non-unitary gate matrix.
    #[error("Invalid gate '{name}': {reason}")]
    InvalidGate {
        /// Name of the gate.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Gate name with no twirling set available.
    #[error("Unknown gate '{name}' (known gates: {})", .known.join(", "))]
    UnknownGate {
        /// The requested name.
        name: String,
        /// Names that are recognised.
        known: Vec<String>,
    },

    /// Substitution requested with a zero-length twirling set.
    #[error("Twirling set for '{0}' is empty")]
    EmptyTwirlingSet(String),

    /// A recomposed unitary does not match its gate under the claimed phase.
    #[error("Equivalence check failed for '{gate}' with {assignment}: residual {residual:e}")]
    EquivalenceVerification {
        /// Name of the gate.
        gate: String,
        /// The offending assignment.
        assignment: TwirlAssignment,
        /// Frobenius norm of the phase-corrected difference.
        residual: f64,
    },

    /// The same assignment appears twice in one twirling set.
    #[error("Duplicate assignment {assignment} in twirling set for '{gate}'")]
    DuplicateAssignment {
        /// Name of the gate.
        gate: String,
        /// The repeated assignment.
        assignment: TwirlAssignment,
    },

    /// The same gate appears twice in one registry.
    #[error("Duplicate twirling set for gate '{0}'")]
    DuplicateGate(String),

    /// A Pauli symbol or assignment string could not be parsed.
    #[error("Invalid Pauli assignment '{0}'")]
    InvalidAssignment(String),

    /// Instruction with no unitary (measure, reset) in a unitary computation.
    #[error("Instruction '{0}' has no unitary matrix")]
    NonUnitaryInstruction(String),

    /// Circuit too wide for a dense unitary.
    #[error("Circuit has {num_qubits} qubits, dense unitaries support at most {max}")]
    CircuitTooLarge {
        /// Number of qubits in the circuit.
        num_qubits: usize,
        /// Largest supported width.
        max: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for twirling operations.
pub type TwirlResult<T> = Result<T, TwirlError>;
