//! Gate catalogue: names and matrices of the gates that can be twirled.

use std::f64::consts::FRAC_1_SQRT_2;

use ndarray::{Array2, array, s};
use num_complex::Complex64;
use twirl_ir::{Gate, GateKind, StandardGate};

use crate::error::{TwirlError, TwirlResult};
use crate::pauli::Pauli;
use crate::unitary::{MAX_DENSE_QUBITS, Matrix, is_unitary, kron};

/// The two-qubit gates twirled by default, in catalogue order.
pub const STANDARD_TWIRL_GATES: [StandardGate; 11] = [
    StandardGate::CX,
    StandardGate::CY,
    StandardGate::CZ,
    StandardGate::CH,
    StandardGate::CS,
    StandardGate::DCX,
    StandardGate::CSX,
    StandardGate::CSdg,
    StandardGate::ECR,
    StandardGate::Swap,
    StandardGate::ISwap,
];

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Block-diagonal `|0⟩⟨0| ⊗ I + |1⟩⟨1| ⊗ u` with the control on wire 0.
fn controlled(u: &Matrix) -> Matrix {
    let mut m = Array2::zeros((4, 4));
    m[[0, 0]] = c(1.0, 0.0);
    m[[1, 1]] = c(1.0, 0.0);
    m.slice_mut(s![2..4, 2..4]).assign(u);
    m
}

fn permutation(columns_to_rows: [usize; 4]) -> Matrix {
    let mut m = Array2::zeros((4, 4));
    for (col, &row) in columns_to_rows.iter().enumerate() {
        m[[row, col]] = c(1.0, 0.0);
    }
    m
}

/// Matrix of a standard gate, big-endian with operand 0 most significant.
pub fn standard_gate_matrix(gate: StandardGate) -> Matrix {
    let o = c(0.0, 0.0);
    let l = c(1.0, 0.0);
    let i = c(0.0, 1.0);
    let h = FRAC_1_SQRT_2;

    match gate {
        StandardGate::I => Pauli::I.matrix(),
        StandardGate::X => Pauli::X.matrix(),
        StandardGate::Y => Pauli::Y.matrix(),
        StandardGate::Z => Pauli::Z.matrix(),
        StandardGate::H => array![[c(h, 0.0), c(h, 0.0)], [c(h, 0.0), c(-h, 0.0)]],
        StandardGate::S => array![[l, o], [o, i]],
        StandardGate::Sdg => array![[l, o], [o, -i]],
        StandardGate::T => array![[l, o], [o, c(h, h)]],
        StandardGate::Tdg => array![[l, o], [o, c(h, -h)]],
        StandardGate::SX => array![[c(0.5, 0.5), c(0.5, -0.5)], [c(0.5, -0.5), c(0.5, 0.5)]],
        StandardGate::SXdg => array![[c(0.5, -0.5), c(0.5, 0.5)], [c(0.5, 0.5), c(0.5, -0.5)]],

        StandardGate::CX => controlled(&standard_gate_matrix(StandardGate::X)),
        StandardGate::CY => controlled(&standard_gate_matrix(StandardGate::Y)),
        StandardGate::CZ => controlled(&standard_gate_matrix(StandardGate::Z)),
        StandardGate::CH => controlled(&standard_gate_matrix(StandardGate::H)),
        StandardGate::CS => controlled(&standard_gate_matrix(StandardGate::S)),
        StandardGate::CSdg => controlled(&standard_gate_matrix(StandardGate::Sdg)),
        StandardGate::CSX => controlled(&standard_gate_matrix(StandardGate::SX)),
        // CX(0, 1) followed by CX(1, 0).
        StandardGate::DCX => permutation([0, 3, 1, 2]),
        // (X ⊗ I − Y ⊗ X) / √2
        StandardGate::ECR => {
            let xi = kron(&Pauli::X.matrix(), &Pauli::I.matrix());
            let yx = kron(&Pauli::Y.matrix(), &Pauli::X.matrix());
            (xi - yx).mapv(|z| z * h)
        }
        StandardGate::Swap => permutation([0, 2, 1, 3]),
        StandardGate::ISwap => array![
            [l, o, o, o],
            [o, o, i, o],
            [o, i, o, o],
            [o, o, o, l]
        ],
    }
}

/// Matrix of any gate: standard gates from their definition, custom gates
/// from the matrix they carry.
pub fn gate_matrix(gate: &Gate) -> TwirlResult<Matrix> {
    match &gate.kind {
        GateKind::Standard(g) => Ok(standard_gate_matrix(*g)),
        GateKind::Custom(custom) => {
            let data = custom.matrix.clone().ok_or_else(|| TwirlError::InvalidGate {
                name: custom.name.clone(),
                reason: "custom gate carries no matrix".into(),
            })?;
            if custom.num_qubits as usize > MAX_DENSE_QUBITS {
                return Err(TwirlError::InvalidGate {
                    name: custom.name.clone(),
                    reason: format!(
                        "{} qubits exceeds the dense limit of {MAX_DENSE_QUBITS}",
                        custom.num_qubits
                    ),
                });
            }
            let dim = 1usize << custom.num_qubits;
            Array2::from_shape_vec((dim, dim), data).map_err(|e| TwirlError::InvalidGate {
                name: custom.name.clone(),
                reason: e.to_string(),
            })
        }
    }
}

/// Check that `matrix` is a finite 4×4 unitary.
pub fn validate_two_qubit_matrix(
    name: &str,
    matrix: &Matrix,
    unitarity_tolerance: f64,
) -> TwirlResult<()> {
    let invalid = |reason: String| TwirlError::InvalidGate {
        name: name.to_string(),
        reason,
    };

    if matrix.dim() != (4, 4) {
        return Err(invalid(format!("expected a 4x4 matrix, got {:?}", matrix.dim())));
    }
    if matrix.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(invalid("matrix has non-finite entries".into()));
    }
    if !is_unitary(matrix, unitarity_tolerance) {
        return Err(invalid(format!(
            "matrix is not unitary within {unitarity_tolerance:e}"
        )));
    }
    Ok(())
}

/// A named two-qubit gate and its matrix (control = wire 0).
#[derive(Debug, Clone, PartialEq)]
pub struct TwoQubitGateSpec {
    name: String,
    matrix: Matrix,
}

impl TwoQubitGateSpec {
    /// Create a gate spec, validating the matrix.
    pub fn new(
        name: impl Into<String>,
        matrix: Matrix,
        unitarity_tolerance: f64,
    ) -> TwirlResult<Self> {
        let name = name.into();
        validate_two_qubit_matrix(&name, &matrix, unitarity_tolerance)?;
        Ok(Self { name, matrix })
    }

    /// Create a gate spec from a circuit gate.
    pub fn from_gate(gate: &Gate, unitarity_tolerance: f64) -> TwirlResult<Self> {
        Self::new(gate.name(), gate_matrix(gate)?, unitarity_tolerance)
    }

    /// Name of the gate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 4×4 matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

/// An ordered collection of two-qubit gates.
#[derive(Debug, Clone, Default)]
pub struct GateCatalogue {
    gates: Vec<TwoQubitGateSpec>,
}

impl GateCatalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalogue of [`STANDARD_TWIRL_GATES`].
    pub fn standard() -> Self {
        let gates = STANDARD_TWIRL_GATES
            .iter()
            .map(|&g| TwoQubitGateSpec {
                name: g.name().to_string(),
                matrix: standard_gate_matrix(g),
            })
            .collect();
        Self { gates }
    }

    /// Add a gate. Names must be unique.
    pub fn push(&mut self, spec: TwoQubitGateSpec) -> TwirlResult<()> {
        if self.get(spec.name()).is_some() {
            return Err(TwirlError::InvalidGate {
                name: spec.name,
                reason: "a gate with this name is already catalogued".into(),
            });
        }
        self.gates.push(spec);
        Ok(())
    }

    /// Look up a gate by name.
    pub fn get(&self, name: &str) -> Option<&TwoQubitGateSpec> {
        self.gates.iter().find(|g| g.name == name)
    }

    /// Gate names in catalogue order.
    pub fn names(&self) -> Vec<&str> {
        self.gates.iter().map(|g| g.name.as_str()).collect()
    }

    /// A sub-catalogue with the named gates, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> TwirlResult<GateCatalogue> {
        let mut selected = GateCatalogue::new();
        for name in names {
            let name = name.as_ref();
            let spec = self.get(name).ok_or_else(|| TwirlError::UnknownGate {
                name: name.to_string(),
                known: self.names().into_iter().map(String::from).collect(),
            })?;
            if selected.get(name).is_none() {
                selected.gates.push(spec.clone());
            }
        }
        Ok(selected)
    }

    /// The gates as a slice.
    pub fn as_slice(&self) -> &[TwoQubitGateSpec] {
        &self.gates
    }

    /// Iterate over gates in catalogue order.
    pub fn iter(&self) -> std::slice::Iter<'_, TwoQubitGateSpec> {
        self.gates.iter()
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}
