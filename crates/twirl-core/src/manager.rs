//! Pass manager for orchestrating twirling passes.

use tracing::{debug, info, instrument};

use twirl_ir::CircuitDag;

use crate::error::TwirlResult;
use crate::pass::{IntegrityCheck, Pass, PauliTwirlPass};
use crate::registry::TwirlingRegistry;

/// Golden-ratio increment used to spread per-gate seeds.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Manages and executes a sequence of passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// One twirling pass per gate, in the order given, then an integrity check.
    ///
    /// With a seed, each gate gets its own seed derived from it and from the
    /// gate's position, so the whole pipeline is reproducible.
    pub fn twirling<S: AsRef<str>>(
        registry: &TwirlingRegistry,
        gates: &[S],
        seed: Option<u64>,
    ) -> TwirlResult<Self> {
        let mut pm = Self::new();
        for (i, gate) in gates.iter().enumerate() {
            let set = registry.get(gate.as_ref())?.clone();
            let gate_seed = seed.map(|s| derive_seed(s, i));
            pm.add_pass(PauliTwirlPass::new(set, gate_seed)?);
        }
        pm.add_pass(IntegrityCheck);
        Ok(pm)
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    ///
    /// Passes run on a working copy that replaces `dag` only once every pass
    /// has succeeded. On error `dag` is left exactly as it was.
    #[instrument(skip(self, dag))]
    pub fn run(&self, dag: &mut CircuitDag) -> TwirlResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        let mut work = dag.clone();
        for pass in &self.passes {
            if pass.should_run(&work) {
                debug!("Running pass: {}", pass.name());
                pass.run(&mut work)?;
                debug!("Pass {} completed, ops: {}", pass.name(), work.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            work.depth(),
            work.num_ops()
        );

        *dag = work;
        Ok(())
    }

    /// Names of the passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

fn derive_seed(seed: u64, index: usize) -> u64 {
    seed ^ SEED_STRIDE.wrapping_mul(index as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::GateCatalogue;
    use crate::config::TwirlConfig;
    use crate::error::TwirlError;
    use twirl_ir::{Circuit, CustomGate, Gate, QubitId};

    fn registry() -> TwirlingRegistry {
        let catalogue = GateCatalogue::standard().select(&["cx", "cz"]).unwrap();
        TwirlingRegistry::build(&catalogue, &TwirlConfig::default()).unwrap()
    }

    fn mixed_circuit() -> Circuit {
        let mut circuit = Circuit::with_size("mixed", 3, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cz(QubitId(1), QubitId(2))
            .unwrap()
            .cx(QubitId(2), QubitId(0))
            .unwrap();
        circuit
    }

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);

        let mut dag = mixed_circuit().into_dag();
        pm.run(&mut dag).unwrap();
        assert_eq!(dag.num_ops(), 4);
    }

    #[test]
    fn test_twirling_pipeline() {
        let pm = PassManager::twirling(&registry(), &["cx", "cz"], Some(9)).unwrap();
        assert_eq!(
            pm.pass_names(),
            vec!["pauli_twirl[cx]", "pauli_twirl[cz]", "integrity_check"]
        );

        let mut a = mixed_circuit();
        let mut b = mixed_circuit();
        pm.run(a.dag_mut()).unwrap();
        pm.run(b.dag_mut()).unwrap();

        assert_eq!(a.dag().num_ops(), 1 + 3 * 5);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_twirling_unknown_gate() {
        assert!(matches!(
            PassManager::twirling(&registry(), &["iswap"], None),
            Err(TwirlError::UnknownGate { .. })
        ));
    }

    #[test]
    fn test_failed_pipeline_leaves_dag_unchanged() {
        let mut circuit = Circuit::with_size("partial", 3, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit
            .gate(
                Gate::custom(CustomGate::new("cz", 3)),
                [QubitId(0), QubitId(1), QubitId(2)],
            )
            .unwrap();
        let before = circuit.snapshot();

        // The cx pass succeeds; the cz pass then rejects the three-qubit "cz".
        let pm = PassManager::twirling(&registry(), &["cx", "cz"], Some(1)).unwrap();
        let result = pm.run(circuit.dag_mut());
        assert!(matches!(result, Err(TwirlError::InvalidGate { .. })));
        assert_eq!(circuit.snapshot(), before);
        assert_eq!(circuit.dag().ops_named("cx").len(), 1);
    }

    #[test]
    fn test_derived_seeds_differ() {
        assert_ne!(derive_seed(1, 0), derive_seed(1, 1));
        assert_ne!(derive_seed(1, 0), 1);
    }
}
