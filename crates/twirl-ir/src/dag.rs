//! DAG-based circuit representation.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::f64::consts::TAU;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex as PetNodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Position of an operation in the instruction sequence.
///
/// Appended operations get `[n]` from a running counter. The replacement of
/// an operation with key `k` gets `k ++ [i]`, which sorts after everything
/// before `k` and before everything after it. Live keys are prefix-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SeqKey(Vec<u64>);

impl SeqKey {
    fn child(&self, i: usize) -> Self {
        let mut path = self.0.clone();
        path.push(i as u64);
        SeqKey(path)
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG representing a wire segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// DAG-based circuit representation.
///
/// The circuit is represented as a directed acyclic graph where:
/// - Nodes are either input nodes, output nodes, or operation nodes
/// - Edges represent wire segments (quantum or classical)
/// - Each wire has exactly one input and one output node
///
/// The graph is a [`StableDiGraph`], so node indices held by a caller stay
/// valid while other nodes are replaced. Indices freed by a replacement are
/// reused by the nodes that replace it.
///
/// ## Traversal order
///
/// [`CircuitDag::topological_ops`] visits operations in instruction order:
/// the order they were appended, with a substituted operation's replacement
/// standing in its place. Node indices play no part, so two DAGs holding the
/// same instruction sequence traverse identically however they were built.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: StableDiGraph<DagNode, DagEdge, u32>,
    /// Map from qubit to its input node.
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from qubit to its output node.
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from classical bit to its input node.
    clbit_inputs: FxHashMap<ClbitId, NodeIndex>,
    /// Map from classical bit to its output node.
    clbit_outputs: FxHashMap<ClbitId, NodeIndex>,
    /// Wire front: maps each wire to the node just before its output node.
    wire_front: FxHashMap<WireId, NodeIndex>,
    /// Instruction-order key of every operation node.
    seq: FxHashMap<NodeIndex, SeqKey>,
    /// Next top-level key handed out by `apply`.
    next_seq: u64,
    /// Global phase of the circuit, in [0, 2π).
    global_phase: f64,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::default(),
            qubit_inputs: FxHashMap::default(),
            qubit_outputs: FxHashMap::default(),
            clbit_inputs: FxHashMap::default(),
            clbit_outputs: FxHashMap::default(),
            wire_front: FxHashMap::default(),
            seq: FxHashMap::default(),
            next_seq: 0,
            global_phase: 0.0,
        }
    }

    /// Add a qubit to the circuit. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let (in_node, out_node) = self.add_wire(WireId::Qubit(qubit));
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
    }

    /// Add a classical bit to the circuit. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.clbit_inputs.contains_key(&clbit) {
            return;
        }
        let (in_node, out_node) = self.add_wire(WireId::Clbit(clbit));
        self.clbit_inputs.insert(clbit, in_node);
        self.clbit_outputs.insert(clbit, out_node);
    }

    fn add_wire(&mut self, wire: WireId) -> (NodeIndex, NodeIndex) {
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        // Initially the input node is the predecessor of the output.
        self.wire_front.insert(wire, in_node);
        (in_node, out_node)
    }

    fn output_node(&self, wire: WireId) -> Option<NodeIndex> {
        match wire {
            WireId::Qubit(q) => self.qubit_outputs.get(&q).copied(),
            WireId::Clbit(c) => self.clbit_outputs.get(&c).copied(),
        }
    }

    /// Check that an instruction could be placed in this DAG.
    #[allow(clippy::cast_possible_truncation)]
    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if !self.clbit_inputs.contains_key(&clbit) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Append an instruction to the end of its wires.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.validate(&instruction)?;

        let wires: Vec<WireId> = instruction.wires().collect();
        let op_node = self.graph.add_node(DagNode::Op(instruction));
        self.seq.insert(op_node, SeqKey(vec![self.next_seq]));
        self.next_seq += 1;

        for wire in wires {
            let out_node = self
                .output_node(wire)
                .ok_or_else(|| IrError::InvalidDag(format!("Wire {wire:?} has no output node")))?;
            let prev_node = self.wire_front[&wire];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for wire {wire:?}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
            self.wire_front.insert(wire, op_node);
        }

        Ok(op_node)
    }

    /// All nodes (including wire endpoints) in deterministic topological order.
    ///
    /// Kahn's algorithm. Ready wire endpoints are taken first, lowest index
    /// first; ready operations are taken in instruction order. Because the
    /// instruction order is itself topological, operations come out exactly
    /// in that order.
    pub fn topological_order(&self) -> Vec<NodeIndex> {
        let mut in_degree: FxHashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|n| (n, self.graph.edges_directed(n, Direction::Incoming).count()))
            .collect();

        let mut ready_wires: BinaryHeap<Reverse<NodeIndex>> = BinaryHeap::new();
        let mut ready_ops: BinaryHeap<Reverse<(SeqKey, NodeIndex)>> = BinaryHeap::new();
        let push_ready = |node: NodeIndex,
                          wires: &mut BinaryHeap<Reverse<NodeIndex>>,
                          ops: &mut BinaryHeap<Reverse<(SeqKey, NodeIndex)>>| {
            if self.graph[node].is_op() {
                let key = self.seq.get(&node).cloned().unwrap_or_default();
                ops.push(Reverse((key, node)));
            } else {
                wires.push(Reverse(node));
            }
        };

        for (&node, _) in in_degree.iter().filter(|&(_, &degree)| degree == 0) {
            push_ready(node, &mut ready_wires, &mut ready_ops);
        }

        let mut order = Vec::with_capacity(in_degree.len());
        loop {
            let node = match ready_wires.pop() {
                Some(Reverse(node)) => node,
                None => match ready_ops.pop() {
                    Some(Reverse((_, node))) => node,
                    None => break,
                },
            };
            order.push(node);
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let succ = edge.target();
                if let Some(degree) = in_degree.get_mut(&succ) {
                    *degree -= 1;
                    if *degree == 0 {
                        push_ready(succ, &mut ready_wires, &mut ready_ops);
                    }
                }
            }
        }
        order
    }

    /// Iterate over operations in deterministic topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> + '_ {
        self.topological_order()
            .into_iter()
            .filter_map(move |idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Gate operations named `name`, in traversal order.
    pub fn ops_named(&self, name: &str) -> Vec<NodeIndex> {
        self.topological_ops()
            .filter(|(_, inst)| inst.is_gate() && inst.name() == name)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Clone every instruction, in traversal order.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.topological_ops().map(|(_, inst)| inst.clone()).collect()
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Replace an operation node with a sequence of instructions, in place.
    ///
    /// The replacement occupies exactly the position of the removed node:
    /// on every wire the first replacement instruction follows the node's
    /// old predecessor and the last one precedes its old successor. Each
    /// replacement instruction may only use wires of the replaced node. All
    /// checks run before the DAG is touched, so on error it is unchanged.
    ///
    /// Returns the indices of the new nodes, in the order given.
    pub fn substitute_node(
        &mut self,
        node: NodeIndex,
        replacement: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Vec<NodeIndex>> {
        let replacement: Vec<Instruction> = replacement.into_iter().collect();
        let old = self.get_instruction(node).ok_or(IrError::InvalidNode)?;
        let node_name = old.name().to_string();
        let owned: Vec<WireId> = old.wires().collect();

        for inst in &replacement {
            self.validate(inst)?;
            if let Some(wire) = inst.wires().find(|w| !owned.contains(w)) {
                return Err(IrError::ForeignWire { node_name, wire });
            }
        }

        let mut boundaries = Vec::with_capacity(owned.len());
        for &wire in &owned {
            let pred = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .find(|e| e.weight().wire == wire)
                .map(|e| e.source());
            let succ = self
                .graph
                .edges_directed(node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire)
                .map(|e| e.target());
            match (pred, succ) {
                (Some(pred), Some(succ)) => boundaries.push((wire, pred, succ)),
                _ => {
                    return Err(IrError::InvalidDag(format!(
                        "Node '{node_name}' is detached from wire {wire:?}"
                    )));
                }
            }
        }

        let key = self.seq.remove(&node).unwrap_or_default();
        self.graph.remove_node(node);

        let mut front: FxHashMap<WireId, NodeIndex> =
            boundaries.iter().map(|&(wire, pred, _)| (wire, pred)).collect();
        let mut new_nodes = Vec::with_capacity(replacement.len());

        for inst in replacement {
            let wires: Vec<WireId> = inst.wires().collect();
            let new_node = self.graph.add_node(DagNode::Op(inst));
            self.seq.insert(new_node, key.child(new_nodes.len()));
            for wire in wires {
                let prev = front[&wire];
                self.graph.add_edge(prev, new_node, DagEdge { wire });
                front.insert(wire, new_node);
            }
            new_nodes.push(new_node);
        }

        for (wire, _, succ) in boundaries {
            let last = front[&wire];
            self.graph.add_edge(last, succ, DagEdge { wire });
            if self.output_node(wire) == Some(succ) {
                self.wire_front.insert(wire, last);
            }
        }

        Ok(new_nodes)
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbit_inputs.len()
    }

    /// Get the number of operations.
    ///
    /// Computed as total nodes minus input and output nodes (2 per wire).
    #[inline]
    pub fn num_ops(&self) -> usize {
        let io_nodes = 2 * (self.qubit_inputs.len() + self.clbit_inputs.len());
        self.graph.node_count().saturating_sub(io_nodes)
    }

    /// Calculate the circuit depth.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for node in self.topological_order() {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = if self.graph[node].is_op() {
                max_pred_depth + 1
            } else {
                max_pred_depth
            };

            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Qubits of the circuit, sorted by id.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<_> = self.qubit_inputs.keys().copied().collect();
        qubits.sort_unstable();
        qubits
    }

    /// Classical bits of the circuit, sorted by id.
    pub fn clbits(&self) -> Vec<ClbitId> {
        let mut clbits: Vec<_> = self.clbit_inputs.keys().copied().collect();
        clbits.sort_unstable();
        clbits
    }

    /// Get the global phase, in [0, 2π).
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Set the global phase.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.global_phase = phase.rem_euclid(TAU);
    }

    /// Add to the accumulated global phase.
    pub fn add_global_phase(&mut self, delta: f64) {
        self.set_global_phase(self.global_phase + delta);
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &StableDiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that:
    /// - The graph is acyclic
    /// - Every wire can be walked from its In node to its Out node
    pub fn verify_integrity(&self) -> IrResult<()> {
        if self.topological_order().len() != self.graph.node_count() {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        let qubit_wires = self.qubit_inputs.iter().map(|(&q, &n)| (WireId::Qubit(q), n));
        let clbit_wires = self.clbit_inputs.iter().map(|(&c, &n)| (WireId::Clbit(c), n));

        for (wire, in_node) in qubit_wires.chain(clbit_wires) {
            let out_node = self.output_node(wire).ok_or_else(|| {
                IrError::InvalidDag(format!("Wire {wire:?} has an In node but no Out node"))
            })?;

            let mut current = in_node;
            let mut steps = 0;
            while current != out_node {
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire {wire:?} is broken: no outgoing edge from node {current:?}"
                        ))
                    })?;

                steps += 1;
                if steps > self.graph.node_count() {
                    return Err(IrError::InvalidDag(format!(
                        "Wire {wire:?} has too many steps (possible infinite loop)"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;
    use std::f64::consts::PI;

    fn two_qubit_dag() -> CircuitDag {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag
    }

    fn names(dag: &CircuitDag) -> Vec<String> {
        dag.topological_ops()
            .map(|(_, inst)| inst.name().to_string())
            .collect()
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_clbits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_bell_state_depth() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = two_qubit_dag();
        let result = dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0)]));

        match result {
            Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            }) => {
                assert_eq!(gate_name, "cx");
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("Expected QubitCountMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));

        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(99));
        match dag.apply(inst) {
            Err(IrError::QubitNotFound { qubit, gate_name }) => {
                assert_eq!(qubit, QubitId(99));
                assert_eq!(gate_name.as_deref(), Some("cx"));
            }
            other => panic!("Expected QubitNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut dag = two_qubit_dag();
        let inst = Instruction::two_qubit_gate(StandardGate::CZ, QubitId(1), QubitId(1));
        assert!(matches!(
            dag.apply(inst),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_traversal_follows_append_order() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::X, QubitId(1)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(1),
            QubitId(0),
        ))
        .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::Z, QubitId(1)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        assert_eq!(names(&dag), vec!["x", "h", "cx", "z", "cx"]);
        assert_eq!(dag.ops_named("cx").len(), 2);
        assert!(dag.ops_named("swap").is_empty());
    }

    #[test]
    fn test_substitute_node_in_the_middle() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        let cx = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::S, QubitId(1)))
            .unwrap();

        let new_nodes = dag
            .substitute_node(
                cx,
                [
                    Instruction::single_qubit_gate(StandardGate::X, QubitId(0)),
                    Instruction::single_qubit_gate(StandardGate::Z, QubitId(1)),
                    Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
                    Instruction::single_qubit_gate(StandardGate::X, QubitId(0)),
                    Instruction::single_qubit_gate(StandardGate::Z, QubitId(1)),
                ],
            )
            .unwrap();

        assert_eq!(new_nodes.len(), 5);
        assert_eq!(dag.num_ops(), 7);
        assert_eq!(names(&dag), vec!["h", "x", "z", "cx", "x", "z", "s"]);
        dag.verify_integrity().unwrap();

        // The spliced CX keeps its control/target binding.
        let spliced = dag.get_instruction(new_nodes[2]).unwrap();
        assert_eq!(spliced.qubits, vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_substitute_last_node_updates_wire_front() {
        let mut dag = two_qubit_dag();
        let cz = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CZ,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();
        dag.substitute_node(
            cz,
            [Instruction::two_qubit_gate(
                StandardGate::CZ,
                QubitId(0),
                QubitId(1),
            )],
        )
        .unwrap();

        // Appending after the substitution must land after the new node.
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();
        assert_eq!(names(&dag), vec!["cz", "h"]);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_substitute_rejects_foreign_wire_without_mutation() {
        let mut dag = CircuitDag::new();
        for q in 0..3 {
            dag.add_qubit(QubitId(q));
        }
        let cx = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();

        let result = dag.substitute_node(
            cx,
            [Instruction::single_qubit_gate(StandardGate::X, QubitId(2))],
        );
        assert!(matches!(result, Err(IrError::ForeignWire { .. })));
        assert_eq!(names(&dag), vec!["cx"]);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_traversal_independent_of_node_indices() {
        let qubits = [QubitId(0), QubitId(1), QubitId(2)];
        let sandwich = |a: StandardGate, b: StandardGate| {
            vec![
                Instruction::single_qubit_gate(a, QubitId(0)),
                Instruction::single_qubit_gate(b, QubitId(1)),
                Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
                Instruction::single_qubit_gate(a, QubitId(0)),
                Instruction::single_qubit_gate(b, QubitId(1)),
            ]
        };

        // Substituted: the first replacement reuses the freed index, the rest
        // land above the index of the later h.
        let mut substituted = CircuitDag::new();
        for q in qubits {
            substituted.add_qubit(q);
        }
        let cx = substituted
            .apply(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(0),
                QubitId(1),
            ))
            .unwrap();
        substituted
            .apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(2)))
            .unwrap();
        let new_nodes = substituted
            .substitute_node(cx, sandwich(StandardGate::X, StandardGate::Z))
            .unwrap();
        // Nested: replace the inner cx again.
        substituted
            .substitute_node(new_nodes[2], sandwich(StandardGate::Y, StandardGate::Y))
            .unwrap();
        substituted.verify_integrity().unwrap();

        let expected = vec!["x", "z", "y", "y", "cx", "y", "y", "x", "z", "h"];
        assert_eq!(names(&substituted), expected);

        let mut appended = CircuitDag::new();
        for q in qubits {
            appended.add_qubit(q);
        }
        for (_, inst) in substituted.topological_ops() {
            appended.apply(inst.clone()).unwrap();
        }
        assert_eq!(names(&appended), expected);
    }

    #[test]
    fn test_substitute_invalid_node() {
        let mut dag = two_qubit_dag();
        let input_node = dag.qubit_inputs[&QubitId(0)];
        assert!(matches!(
            dag.substitute_node(input_node, []),
            Err(IrError::InvalidNode)
        ));
    }

    #[test]
    fn test_global_phase_accumulates_modulo_two_pi() {
        let mut dag = CircuitDag::new();
        dag.add_global_phase(PI);
        assert!((dag.global_phase() - PI).abs() < 1e-12);
        dag.add_global_phase(PI);
        assert!(dag.global_phase().abs() < 1e-12);
        dag.add_global_phase(-PI / 2.0);
        assert!((dag.global_phase() - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_verify_integrity_with_measurement() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_clbit(ClbitId(0));
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::measure(QubitId(0), ClbitId(0)))
            .unwrap();

        dag.verify_integrity().unwrap();
    }
}
