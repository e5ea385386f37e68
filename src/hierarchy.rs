//! Scaffold hierarchy construction.
//!
//! A [`HierarchyBuilder`] owns one directed graph for the duration of a build.
//! Molecule nodes point at their top-level scaffold; scaffold nodes point at
//! the simpler parents obtained by removing one terminal ring system. Scaffold
//! nodes are keyed by identifier, so a scaffold reached from several
//! molecules or along several paths is a single node.

use std::collections::HashMap;

use log::{debug, info, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::gate::RingSystemGate;
use crate::identity::{canonicalize, IdentifierScheme};
use crate::mol::Mol;
use crate::scaffold::{fragment, murcko_scaffold, preprocess, PreprocessOptions, Scaffold};

/// Where a molecule ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoleculeState {
    /// More ring systems than the cutoff; not decomposed.
    Filtered,
    /// No rings, so no top-level scaffold.
    Linear,
    Scaffolded,
}

#[derive(Debug, Clone)]
pub struct MoleculeNode {
    pub name: String,
    /// Canonical aromatic SMILES of the whole molecule, whatever the scheme.
    pub canonical_structure: String,
    pub state: MoleculeState,
    pub mol: Mol,
}

#[derive(Debug, Clone)]
pub struct ScaffoldNode {
    pub identifier: String,
    pub scaffold: Scaffold,
}

impl ScaffoldNode {
    pub fn ring_system_count(&self) -> usize {
        self.scaffold.ring_system_count()
    }
}

#[derive(Debug, Clone)]
pub enum HierarchyNode {
    Molecule(MoleculeNode),
    Scaffold(ScaffoldNode),
}

/// Counters reported alongside a finished hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub num_molecules: usize,
    pub num_linear: usize,
    pub num_filtered: usize,
    pub num_scaffolds: usize,
}

/// Settings one build runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub scheme: IdentifierScheme,
    pub ring_cutoff: usize,
    pub merge_spiro: bool,
    pub preprocess: PreprocessOptions,
}

impl BuildOptions {
    pub fn from_config(config: &EngineConfig, ring_cutoff: usize) -> Self {
        Self {
            scheme: config.identifier_scheme,
            ring_cutoff,
            merge_spiro: config.merge_spiro,
            preprocess: config.preprocess,
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self::from_config(&config, config.ring_cutoff)
    }
}

/// The completed graph of one build.
#[derive(Debug, Default)]
pub struct ScaffoldHierarchy {
    graph: DiGraph<HierarchyNode, ()>,
    scaffolds: HashMap<String, NodeIndex>,
    molecules: Vec<NodeIndex>,
}

impl ScaffoldHierarchy {
    pub fn graph(&self) -> &DiGraph<HierarchyNode, ()> {
        &self.graph
    }

    /// Molecule nodes in insertion order.
    pub fn molecules(&self) -> &[NodeIndex] {
        &self.molecules
    }

    pub fn molecule(&self, idx: NodeIndex) -> Option<&MoleculeNode> {
        match self.graph.node_weight(idx)? {
            HierarchyNode::Molecule(node) => Some(node),
            HierarchyNode::Scaffold(_) => None,
        }
    }

    pub fn scaffold(&self, idx: NodeIndex) -> Option<&ScaffoldNode> {
        match self.graph.node_weight(idx)? {
            HierarchyNode::Scaffold(node) => Some(node),
            HierarchyNode::Molecule(_) => None,
        }
    }

    pub fn scaffold_index(&self, identifier: &str) -> Option<NodeIndex> {
        self.scaffolds.get(identifier).copied()
    }

    pub fn num_scaffolds(&self) -> usize {
        self.scaffolds.len()
    }

    /// Targets of the outgoing edges of `idx`, ordered by scaffold identifier.
    ///
    /// The order depends only on the parents themselves, not on which other
    /// molecules were built into the same hierarchy first.
    pub fn parents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut targets: Vec<(&str, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| {
                let identifier = self
                    .scaffold(e.target())
                    .map_or("", |node| node.identifier.as_str());
                (identifier, e.target())
            })
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets.into_iter().map(|(_, target)| target).collect()
    }
}

pub struct HierarchyBuilder {
    options: BuildOptions,
    gate: RingSystemGate,
    hierarchy: ScaffoldHierarchy,
    stats: BuildStats,
}

impl HierarchyBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            gate: RingSystemGate::new(options.ring_cutoff, options.merge_spiro),
            hierarchy: ScaffoldHierarchy::default(),
            stats: BuildStats::default(),
        }
    }

    /// Register `mol` and, when it passes the gate and has rings, build the
    /// hierarchy above its top-level scaffold.
    pub fn add_molecule(&mut self, mol: Mol, name: &str) -> NodeIndex {
        self.stats.num_molecules += 1;
        let label = if name.is_empty() {
            format!("#{}", self.stats.num_molecules)
        } else {
            name.to_string()
        };

        let decision = self.gate.admit(&mol);
        if !decision.is_admitted() {
            warn!(
                "molecule {label} filtered ({} > {} ring systems)",
                decision.ring_systems(),
                self.options.ring_cutoff
            );
            self.stats.num_filtered += 1;
            return self.insert_molecule(mol, name, MoleculeState::Filtered);
        }

        let top = murcko_scaffold(&mol);
        if top.is_empty() {
            info!("no top-level scaffold for molecule {label}");
            self.stats.num_linear += 1;
            return self.insert_molecule(mol, name, MoleculeState::Linear);
        }

        let top = Scaffold::new(
            preprocess(top, &self.options.preprocess),
            self.options.merge_spiro,
        );
        let molecule = self.insert_molecule(mol, name, MoleculeState::Scaffolded);
        let (scaffold, created) = self.get_or_create(top);
        self.hierarchy.graph.update_edge(molecule, scaffold, ());
        if created {
            self.construct(scaffold);
        }
        molecule
    }

    pub fn finish(mut self) -> (ScaffoldHierarchy, BuildStats) {
        self.stats.num_scaffolds = self.hierarchy.num_scaffolds();
        debug!(
            "hierarchy built: {} molecules, {} scaffolds, {} linear, {} filtered",
            self.stats.num_molecules,
            self.stats.num_scaffolds,
            self.stats.num_linear,
            self.stats.num_filtered
        );
        (self.hierarchy, self.stats)
    }

    fn insert_molecule(
        &mut self,
        mol: Mol,
        name: &str,
        state: MoleculeState,
    ) -> NodeIndex {
        let node = MoleculeNode {
            name: name.to_string(),
            canonical_structure: canonicalize(&mol, IdentifierScheme::CanonicalSmiles),
            state,
            mol,
        };
        let idx = self.hierarchy.graph.add_node(HierarchyNode::Molecule(node));
        self.hierarchy.molecules.push(idx);
        idx
    }

    fn get_or_create(&mut self, scaffold: Scaffold) -> (NodeIndex, bool) {
        let identifier = canonicalize(scaffold.mol(), self.options.scheme);
        if let Some(&idx) = self.hierarchy.scaffolds.get(&identifier) {
            return (idx, false);
        }
        let node = ScaffoldNode {
            identifier: identifier.clone(),
            scaffold,
        };
        let idx = self.hierarchy.graph.add_node(HierarchyNode::Scaffold(node));
        self.hierarchy.scaffolds.insert(identifier, idx);
        (idx, true)
    }

    /// Link `child` to each of its parents, descending into parents seen for
    /// the first time that still have more than one ring system.
    fn construct(&mut self, child: NodeIndex) {
        let parents = match self.hierarchy.scaffold(child) {
            Some(node) => fragment(&node.scaffold, self.options.merge_spiro),
            None => return,
        };
        for parent in parents {
            let ring_systems = parent.ring_system_count();
            let (idx, created) = self.get_or_create(parent);
            self.hierarchy.graph.update_edge(child, idx, ());
            if created && ring_systems > 1 {
                self.construct(idx);
            }
        }
    }
}
