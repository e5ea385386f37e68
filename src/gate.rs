use crate::mol::Mol;
use crate::rings::ring_system_count;

/// Outcome of gating one molecule on its ring-system count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Admitted { ring_systems: usize },
    Filtered { ring_systems: usize },
}

impl GateDecision {
    pub fn is_admitted(self) -> bool {
        matches!(self, GateDecision::Admitted { .. })
    }

    pub fn ring_systems(self) -> usize {
        match self {
            GateDecision::Admitted { ring_systems } | GateDecision::Filtered { ring_systems } => {
                ring_systems
            }
        }
    }
}

/// Admits molecules with at most `cutoff` ring systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSystemGate {
    pub cutoff: usize,
    pub merge_spiro: bool,
}

impl RingSystemGate {
    pub fn new(cutoff: usize, merge_spiro: bool) -> Self {
        Self {
            cutoff,
            merge_spiro,
        }
    }

    pub fn ring_system_count(&self, mol: &Mol) -> usize {
        ring_system_count(mol, self.merge_spiro)
    }

    pub fn admit(&self, mol: &Mol) -> GateDecision {
        let ring_systems = self.ring_system_count(mol);
        if ring_systems <= self.cutoff {
            GateDecision::Admitted { ring_systems }
        } else {
            GateDecision::Filtered { ring_systems }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;

    const FIVE_SYSTEMS: &str = "Cn1cc(C2=C(c3cn(C4CCN(Cc5ccccn5)CC4)c4ccccc34)C(=O)NC2=O)c2ccccc21";

    #[test]
    fn counts_fused_systems_once() {
        let gate = RingSystemGate::new(10, true);
        let count = |s: &str| gate.ring_system_count(&from_smiles(s).unwrap());
        assert_eq!(count("CCC"), 0);
        assert_eq!(count("c1ccc2ccccc2c1"), 1);
        assert_eq!(count("c1ccccc1-c1ccccc1"), 2);
        assert_eq!(count(FIVE_SYSTEMS), 5);
    }

    #[test]
    fn cutoff_boundary() {
        let mol = from_smiles(FIVE_SYSTEMS).unwrap();
        assert_eq!(
            RingSystemGate::new(5, true).admit(&mol),
            GateDecision::Admitted { ring_systems: 5 }
        );
        let decision = RingSystemGate::new(4, true).admit(&mol);
        assert!(!decision.is_admitted());
        assert_eq!(decision.ring_systems(), 5);
    }

    #[test]
    fn acyclic_passes_zero_cutoff() {
        let mol = from_smiles("CCO").unwrap();
        assert!(RingSystemGate::new(0, true).admit(&mol).is_admitted());
    }

    #[test]
    fn spiro_merging_changes_count() {
        let mol = from_smiles("C1CCC2(CC1)CCNCC2").unwrap();
        assert_eq!(RingSystemGate::new(1, true).ring_system_count(&mol), 1);
        assert!(!RingSystemGate::new(1, false).admit(&mol).is_admitted());
    }
}
