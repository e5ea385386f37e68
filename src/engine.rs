use log::debug;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::hierarchy::{BuildOptions, BuildStats, HierarchyBuilder, ScaffoldHierarchy};
use crate::projector::{project, ScaffoldRecord};
use crate::smiles::from_smiles;

/// Records for a batch, in input order, with the build counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub records: Vec<Option<ScaffoldRecord>>,
    pub stats: BuildStats,
}

/// Entry point for scaffold decomposition.
///
/// The engine holds only configuration; every call builds and discards its
/// own hierarchy, so one engine can serve many threads.
///
/// ```
/// use hiers::ScaffoldEngine;
///
/// let engine = ScaffoldEngine::new("canon_smiles").unwrap();
/// let record = engine.get_scaffolds("c1ccccc1CC1CCNCC1", "", 10).unwrap();
/// assert_eq!(record.scaffolds.len(), 2);
/// assert!(engine.get_scaffolds("not a smiles", "", 10).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScaffoldEngine {
    config: EngineConfig,
}

impl ScaffoldEngine {
    /// Engine with default settings and the named identifier scheme.
    pub fn new(identifier_scheme: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_config(EngineConfig {
            identifier_scheme: identifier_scheme.parse()?,
            ..EngineConfig::default()
        }))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        EngineConfig::from_json_str(s).map(Self::with_config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scaffolds of one structure. `None` means the structure could not be
    /// parsed; a parsed molecule always yields a record, possibly empty.
    pub fn get_scaffolds(
        &self,
        structure: &str,
        display_name: &str,
        ring_cutoff: usize,
    ) -> Option<ScaffoldRecord> {
        self.get_scaffolds_batch(&[(structure, display_name)], ring_cutoff)
            .records
            .pop()
            .flatten()
    }

    /// Scaffolds of every `(structure, display_name)` pair, sharing one
    /// hierarchy. Each record depends only on its own input.
    pub fn get_scaffolds_batch(&self, inputs: &[(&str, &str)], ring_cutoff: usize) -> BatchResult {
        let (hierarchy, molecules, stats) = self.build(inputs, ring_cutoff);
        let records = molecules
            .into_iter()
            .map(|idx| idx.and_then(|idx| project(&hierarchy, idx)))
            .collect();
        BatchResult { records, stats }
    }

    /// Build the hierarchy for `inputs`, returning the molecule node of each
    /// input (`None` for unparseable ones).
    pub fn build(
        &self,
        inputs: &[(&str, &str)],
        ring_cutoff: usize,
    ) -> (ScaffoldHierarchy, Vec<Option<NodeIndex>>, BuildStats) {
        let mut builder = HierarchyBuilder::new(BuildOptions::from_config(&self.config, ring_cutoff));
        let molecules = inputs
            .iter()
            .map(|&(structure, name)| match from_smiles(structure) {
                Ok(mol) => Some(builder.add_molecule(mol, name)),
                Err(e) => {
                    debug!("could not parse {structure:?}: {e}");
                    None
                }
            })
            .collect();
        let (hierarchy, stats) = builder.finish();
        (hierarchy, molecules, stats)
    }
}
