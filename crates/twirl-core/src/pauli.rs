//! Pauli alphabet, twirl assignments and twirling sets.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, array};
use num_complex::Complex64;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use twirl_ir::StandardGate;

use crate::error::{TwirlError, TwirlResult};

/// A single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl Pauli {
    /// The alphabet in its fixed enumeration order.
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    /// The 2×2 matrix of this operator.
    pub fn matrix(self) -> Array2<Complex64> {
        let o = Complex64::new(0.0, 0.0);
        let l = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match self {
            Pauli::I => array![[l, o], [o, l]],
            Pauli::X => array![[o, l], [l, o]],
            Pauli::Y => array![[o, -i], [i, o]],
            Pauli::Z => array![[l, o], [o, -l]],
        }
    }

    /// The standard gate this operator is inserted as.
    pub fn gate(self) -> StandardGate {
        match self {
            Pauli::I => StandardGate::I,
            Pauli::X => StandardGate::X,
            Pauli::Y => StandardGate::Y,
            Pauli::Z => StandardGate::Z,
        }
    }

    /// One-letter symbol.
    pub fn symbol(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Pauli {
    type Err = TwirlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(Pauli::from_symbol), chars.next()) {
            (Some(p), None) => Ok(p),
            _ => Err(TwirlError::InvalidAssignment(s.to_string())),
        }
    }
}

/// Pauli rotations placed around a two-qubit gate.
///
/// Serialized as a four-letter string in field order, e.g. `"XZXI"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TwirlAssignment {
    /// Applied to the control wire before the gate.
    pub pre_control: Pauli,
    /// Applied to the target wire before the gate.
    pub pre_target: Pauli,
    /// Applied to the control wire after the gate.
    pub post_control: Pauli,
    /// Applied to the target wire after the gate.
    pub post_target: Pauli,
}

impl TwirlAssignment {
    /// Number of candidate assignments.
    pub const COUNT: usize = 256;

    /// Create an assignment.
    pub fn new(
        pre_control: Pauli,
        pre_target: Pauli,
        post_control: Pauli,
        post_target: Pauli,
    ) -> Self {
        Self {
            pre_control,
            pre_target,
            post_control,
            post_target,
        }
    }

    /// The assignment that inserts only identities.
    pub fn identity() -> Self {
        Self::new(Pauli::I, Pauli::I, Pauli::I, Pauli::I)
    }

    /// The `index`-th assignment in lexicographic order over
    /// (pre_control, pre_target, post_control, post_target).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 256`.
    pub fn from_index(index: usize) -> Self {
        assert!(index < Self::COUNT, "assignment index {index} out of range");
        Self::new(
            Pauli::ALL[(index >> 6) & 3],
            Pauli::ALL[(index >> 4) & 3],
            Pauli::ALL[(index >> 2) & 3],
            Pauli::ALL[index & 3],
        )
    }

    /// All 256 assignments in lexicographic order.
    pub fn enumerate() -> impl Iterator<Item = TwirlAssignment> {
        (0..Self::COUNT).map(Self::from_index)
    }
}

impl Default for TwirlAssignment {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for TwirlAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.pre_control, self.pre_target, self.post_control, self.post_target
        )
    }
}

impl FromStr for TwirlAssignment {
    type Err = TwirlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let paulis: Vec<Pauli> = s.chars().filter_map(Pauli::from_symbol).collect();
        if paulis.len() != 4 || s.chars().count() != 4 {
            return Err(TwirlError::InvalidAssignment(s.to_string()));
        }
        Ok(Self::new(paulis[0], paulis[1], paulis[2], paulis[3]))
    }
}

impl From<TwirlAssignment> for String {
    fn from(assignment: TwirlAssignment) -> Self {
        assignment.to_string()
    }
}

impl TryFrom<String> for TwirlAssignment {
    type Error = TwirlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Global phase picked up by a twirled gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseCorrection {
    /// The twirled gate equals the gate.
    #[serde(rename = "0")]
    Zero,
    /// The twirled gate equals minus the gate.
    #[serde(rename = "pi")]
    Pi,
}

impl PhaseCorrection {
    /// The phase in radians.
    pub fn radians(self) -> f64 {
        match self {
            PhaseCorrection::Zero => 0.0,
            PhaseCorrection::Pi => PI,
        }
    }

    /// `e^{i·phase}`.
    pub fn factor(self) -> Complex64 {
        match self {
            PhaseCorrection::Zero => Complex64::new(1.0, 0.0),
            PhaseCorrection::Pi => Complex64::new(-1.0, 0.0),
        }
    }
}

impl fmt::Display for PhaseCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseCorrection::Zero => write!(f, "0"),
            PhaseCorrection::Pi => write!(f, "π"),
        }
    }
}

/// One verified twirl of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TwirlEntry {
    /// The Pauli rotations.
    pub assignment: TwirlAssignment,
    /// Phase to add to the circuit when this twirl is used.
    pub phase: PhaseCorrection,
}

/// Ordered, duplicate-free twirls of one gate.
///
/// The order is the index space for random selection, so it is preserved
/// exactly through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTwirlingSet")]
pub struct TwirlingSet {
    gate: String,
    entries: Vec<TwirlEntry>,
}

#[derive(Deserialize)]
struct RawTwirlingSet {
    gate: String,
    entries: Vec<TwirlEntry>,
}

impl TryFrom<RawTwirlingSet> for TwirlingSet {
    type Error = TwirlError;

    fn try_from(raw: RawTwirlingSet) -> Result<Self, Self::Error> {
        TwirlingSet::new(raw.gate, raw.entries)
    }
}

impl TwirlingSet {
    /// Create a set, rejecting repeated assignments.
    pub fn new(gate: impl Into<String>, entries: Vec<TwirlEntry>) -> TwirlResult<Self> {
        let gate = gate.into();
        let mut seen = FxHashSet::default();
        for entry in &entries {
            if !seen.insert(entry.assignment) {
                return Err(TwirlError::DuplicateAssignment {
                    gate,
                    assignment: entry.assignment,
                });
            }
        }
        Ok(Self { gate, entries })
    }

    /// Name of the gate these twirls belong to.
    pub fn gate(&self) -> &str {
        &self.gate
    }

    /// The entries, in selection order.
    pub fn entries(&self) -> &[TwirlEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&TwirlEntry> {
        self.entries.get(index)
    }

    /// Iterate over entries in selection order.
    pub fn iter(&self) -> std::slice::Iter<'_, TwirlEntry> {
        self.entries.iter()
    }

    /// Check whether `assignment` is part of the set.
    pub fn contains(&self, assignment: &TwirlAssignment) -> bool {
        self.entries.iter().any(|e| e.assignment == *assignment)
    }

    /// Phase recorded for `assignment`, if present.
    pub fn phase_of(&self, assignment: &TwirlAssignment) -> Option<PhaseCorrection> {
        self.entries
            .iter()
            .find(|e| e.assignment == *assignment)
            .map(|e| e.phase)
    }
}

impl<'a> IntoIterator for &'a TwirlingSet {
    type Item = &'a TwirlEntry;
    type IntoIter = std::slice::Iter<'a, TwirlEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
