//! Dense unitary matrix utilities.
//!
//! Matrices are `ndarray` arrays of `Complex64` in big-endian order: qubit 0
//! is the most significant bit of a basis index, so `kron(a, b)` applies `a`
//! to wire 0 and `b` to wire 1.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use twirl_ir::{CircuitDag, InstructionKind, QubitId};

use crate::catalogue::gate_matrix;
use crate::error::{TwirlError, TwirlResult};
use crate::pauli::TwirlAssignment;

/// A dense complex matrix.
pub type Matrix = Array2<Complex64>;

/// Widest circuit [`circuit_unitary`] will expand.
pub const MAX_DENSE_QUBITS: usize = 12;

/// The `dim × dim` identity.
pub fn identity(dim: usize) -> Matrix {
    Array2::from_diag_elem(dim, Complex64::new(1.0, 0.0))
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Matrix, b: &Matrix) -> Matrix {
    ndarray::linalg::kron(a, b)
}

/// Conjugate transpose.
pub fn dagger(m: &Matrix) -> Matrix {
    m.t().mapv(|z| z.conj())
}

/// Frobenius norm `sqrt(Σ |m_ij|²)`.
pub fn frobenius_norm(m: ArrayView2<'_, Complex64>) -> f64 {
    m.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
}

/// Frobenius norm of `a - b`.
///
/// Returns `f64::INFINITY` when the shapes differ.
pub fn frobenius_distance(a: &Matrix, b: &Matrix) -> f64 {
    if a.shape() != b.shape() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm_sqr())
        .sum::<f64>()
        .sqrt()
}

/// Check that `m` is square, finite and `‖m†m − I‖_F ≤ tolerance`.
pub fn is_unitary(m: &Matrix, tolerance: f64) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols || m.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return false;
    }
    frobenius_distance(&dagger(m).dot(m), &identity(rows)) <= tolerance
}

/// The operator of a twirled two-qubit gate in circuit time order.
///
/// The pre-rotations act first, so this is
/// `(post_control ⊗ post_target) · gate · (pre_control ⊗ pre_target)`.
pub fn compose_twirl(gate: &Matrix, assignment: &TwirlAssignment) -> Matrix {
    let pre = kron(
        &assignment.pre_control.matrix(),
        &assignment.pre_target.matrix(),
    );
    let post = kron(
        &assignment.post_control.matrix(),
        &assignment.post_target.matrix(),
    );
    post.dot(gate).dot(&pre)
}

/// The full unitary of a circuit, including its global phase.
///
/// Qubits are ordered by id, lowest id most significant. Barriers are
/// ignored; measurements and resets have no unitary and are rejected.
pub fn circuit_unitary(dag: &CircuitDag) -> TwirlResult<Matrix> {
    let qubits = dag.qubits();
    let n = qubits.len();
    if n > MAX_DENSE_QUBITS {
        return Err(TwirlError::CircuitTooLarge {
            num_qubits: n,
            max: MAX_DENSE_QUBITS,
        });
    }

    let position = |q: QubitId| qubits.binary_search(&q).ok();
    let mut u = identity(1 << n);

    for (_, inst) in dag.topological_ops() {
        let gate = match &inst.kind {
            InstructionKind::Gate(gate) => gate,
            InstructionKind::Barrier => continue,
            InstructionKind::Measure | InstructionKind::Reset => {
                return Err(TwirlError::NonUnitaryInstruction(inst.name().to_string()));
            }
        };
        let matrix = gate_matrix(gate)?;
        let wires: Vec<usize> = inst
            .qubits
            .iter()
            .map(|&q| {
                position(q).ok_or_else(|| {
                    TwirlError::Ir(twirl_ir::IrError::QubitNotFound {
                        qubit: q,
                        gate_name: Some(gate.name().to_string()),
                    })
                })
            })
            .collect::<TwirlResult<_>>()?;
        apply_gate(&mut u, &matrix, &wires, n);
    }

    let phase = Complex64::from_polar(1.0, dag.global_phase());
    Ok(u.mapv(|z| z * phase))
}

/// Left-multiply `u` by `gate` acting on `wires` of an `n`-qubit register.
fn apply_gate(u: &mut Matrix, gate: &Matrix, wires: &[usize], n: usize) {
    let k = wires.len();
    let local_dim = 1usize << k;
    // Bit mask of each gate operand in a global basis index.
    let masks: Vec<usize> = wires.iter().map(|&w| 1usize << (n - 1 - w)).collect();
    let touched: usize = masks.iter().sum();

    let offsets: Vec<usize> = (0..local_dim)
        .map(|l| {
            (0..k)
                .filter(|j| l & (1 << (k - 1 - j)) != 0)
                .map(|j| masks[j])
                .sum()
        })
        .collect();

    let dim = 1usize << n;
    let mut buffer = vec![Complex64::new(0.0, 0.0); local_dim];

    for base in (0..dim).filter(|b| b & touched == 0) {
        for col in 0..dim {
            for (l, slot) in buffer.iter_mut().enumerate() {
                *slot = (0..local_dim)
                    .map(|m| gate[[l, m]] * u[[base + offsets[m], col]])
                    .sum();
            }
            for (l, value) in buffer.iter().enumerate() {
                u[[base + offsets[l], col]] = *value;
            }
        }
    }
}
