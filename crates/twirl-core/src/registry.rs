//! Twirling registry: gate name to twirling set, with JSON persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalogue::GateCatalogue;
use crate::config::TwirlConfig;
use crate::error::{TwirlError, TwirlResult};
use crate::generator::TwirlingGenerator;
use crate::pauli::TwirlingSet;

/// Mapping from gate name to its twirling set.
///
/// Serialized as a list of sets ordered by gate name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<TwirlingSet>", try_from = "Vec<TwirlingSet>")]
pub struct TwirlingRegistry {
    sets: BTreeMap<String, TwirlingSet>,
}

impl TwirlingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the twirling set of every catalogued gate.
    ///
    /// Nothing is returned unless every gate succeeds.
    pub fn build(catalogue: &GateCatalogue, config: &TwirlConfig) -> TwirlResult<Self> {
        let generator = TwirlingGenerator::new(config);
        let sets: Vec<TwirlingSet> = if config.parallel {
            catalogue
                .as_slice()
                .par_iter()
                .map(|spec| generator.generate_spec(spec))
                .collect::<TwirlResult<_>>()?
        } else {
            catalogue
                .iter()
                .map(|spec| generator.generate_spec(spec))
                .collect::<TwirlResult<_>>()?
        };

        let mut registry = Self::new();
        for set in sets {
            registry.insert(set);
        }

        info!(
            gates = registry.len(),
            entries = registry.iter().map(TwirlingSet::len).sum::<usize>(),
            "Built twirling registry"
        );
        Ok(registry)
    }

    /// Insert a set under its gate name, returning the set it replaced.
    pub fn insert(&mut self, set: TwirlingSet) -> Option<TwirlingSet> {
        self.sets.insert(set.gate().to_string(), set)
    }

    /// The twirling set of `gate`.
    pub fn get(&self, gate: &str) -> TwirlResult<&TwirlingSet> {
        self.sets.get(gate).ok_or_else(|| TwirlError::UnknownGate {
            name: gate.to_string(),
            known: self.sets.keys().cloned().collect(),
        })
    }

    /// Check whether `gate` has a set.
    pub fn contains(&self, gate: &str) -> bool {
        self.sets.contains_key(gate)
    }

    /// Gate names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Sets in gate-name order.
    pub fn iter(&self) -> impl Iterator<Item = &TwirlingSet> {
        self.sets.values()
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> TwirlResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON, validating every set.
    pub fn from_json(json: &str) -> TwirlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the registry to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> TwirlResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), gates = self.len(), "Saved twirling registry");
        Ok(())
    }

    /// Read a registry from `path`.
    pub fn load(path: impl AsRef<Path>) -> TwirlResult<Self> {
        let path = path.as_ref();
        let registry = Self::from_json(&std::fs::read_to_string(path)?)?;
        debug!(path = %path.display(), gates = registry.len(), "Loaded twirling registry");
        Ok(registry)
    }

    /// Default registry location: `~/.twirl/registry.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".twirl").join("registry.json"))
    }
}

impl From<TwirlingRegistry> for Vec<TwirlingSet> {
    fn from(registry: TwirlingRegistry) -> Self {
        registry.sets.into_values().collect()
    }
}

impl TryFrom<Vec<TwirlingSet>> for TwirlingRegistry {
    type Error = TwirlError;

    fn try_from(sets: Vec<TwirlingSet>) -> Result<Self, Self::Error> {
        let mut registry = Self::new();
        for set in sets {
            let gate = set.gate().to_string();
            if registry.insert(set).is_some() {
                return Err(TwirlError::DuplicateGate(gate));
            }
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::{PhaseCorrection, TwirlAssignment, TwirlEntry};

    fn small_registry() -> TwirlingRegistry {
        let config = TwirlConfig::default();
        let catalogue = GateCatalogue::standard().select(&["cz", "cx"]).unwrap();
        TwirlingRegistry::build(&catalogue, &config).unwrap()
    }

    #[test]
    fn test_build_standard_catalogue() {
        let registry = TwirlingRegistry::build(&GateCatalogue::standard(), &TwirlConfig::default())
            .unwrap();
        assert_eq!(registry.len(), 11);
        for set in registry.iter() {
            assert!(!set.is_empty(), "{}", set.gate());
            assert_eq!(
                set.phase_of(&TwirlAssignment::identity()),
                Some(PhaseCorrection::Zero)
            );
        }
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let catalogue = GateCatalogue::standard();
        let parallel = TwirlingRegistry::build(&catalogue, &TwirlConfig::default()).unwrap();
        let sequential = TwirlingRegistry::build(
            &catalogue,
            &TwirlConfig {
                parallel: false,
                ..TwirlConfig::default()
            },
        )
        .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_get_unknown_lists_names() {
        let registry = small_registry();
        match registry.get("not_a_real_gate") {
            Err(TwirlError::UnknownGate { name, known }) => {
                assert_eq!(name, "not_a_real_gate");
                assert_eq!(known, vec!["cx".to_string(), "cz".to_string()]);
            }
            other => panic!("Expected UnknownGate, got {other:?}"),
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let registry = small_registry();
        let json = registry.to_json().unwrap();
        let back = TwirlingRegistry::from_json(&json).unwrap();
        assert_eq!(back, registry);
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["cx", "cz"]);
    }

    #[test]
    fn test_duplicate_gate_rejected() {
        let set = TwirlingSet::new(
            "cx",
            vec![TwirlEntry {
                assignment: TwirlAssignment::identity(),
                phase: PhaseCorrection::Zero,
            }],
        )
        .unwrap();
        let json = serde_json::to_string(&vec![set.clone(), set]).unwrap();
        assert!(TwirlingRegistry::from_json(&json).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("registry.json");
        let registry = small_registry();

        registry.save(&path).unwrap();
        let loaded = TwirlingRegistry::load(&path).unwrap();
        assert_eq!(loaded, registry);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TwirlingRegistry::load(dir.path().join("absent.json")),
            Err(TwirlError::Io(_))
        ));
    }
}
