//! Pass trait and the twirling passes.

use twirl_ir::CircuitDag;

use crate::error::{TwirlError, TwirlResult};
use crate::pauli::TwirlingSet;
use crate::substitution::Twirler;

/// The kind of pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the DAG.
    Analysis,
    /// Transformation pass that modifies the DAG.
    Transformation,
}

/// A pass that operates on a circuit DAG.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given DAG.
    fn run(&self, dag: &mut CircuitDag) -> TwirlResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _dag: &CircuitDag) -> bool {
        true
    }
}

/// Twirls every occurrence of one gate.
///
/// Each run creates a fresh [`Twirler`]: with a seed, running the pass on
/// equal circuits gives equal results.
#[derive(Debug, Clone)]
pub struct PauliTwirlPass {
    name: String,
    set: TwirlingSet,
    seed: Option<u64>,
}

impl PauliTwirlPass {
    /// Create a pass for the gate of `set`. Empty sets are rejected.
    pub fn new(set: TwirlingSet, seed: Option<u64>) -> TwirlResult<Self> {
        if set.is_empty() {
            return Err(TwirlError::EmptyTwirlingSet(set.gate().to_string()));
        }
        Ok(Self {
            name: format!("pauli_twirl[{}]", set.gate()),
            set,
            seed,
        })
    }

    /// The twirled gate.
    pub fn gate(&self) -> &str {
        self.set.gate()
    }

    /// The seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Pass for PauliTwirlPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag) -> TwirlResult<()> {
        Twirler::new(self.seed).substitute(dag, self.set.gate(), &self.set)?;
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag) -> bool {
        !dag.ops_named(self.set.gate()).is_empty()
    }
}

/// Checks that the DAG is still well formed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityCheck;

impl Pass for IntegrityCheck {
    fn name(&self) -> &str {
        "integrity_check"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag) -> TwirlResult<()> {
        dag.verify_integrity()?;
        Ok(())
    }
}
