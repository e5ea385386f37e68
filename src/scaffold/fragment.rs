use log::trace;

use super::murcko::{extract, murcko_scaffold};
use super::Scaffold;
use crate::rings::ring_systems;

/// HierS parents of `scaffold`.
///
/// Each ring system is removed in turn and the framework of what remains is
/// taken. A candidate is kept only when it is one connected scaffold with
/// exactly one ring system fewer, so removing an inner system (which would
/// split the scaffold) yields nothing. Atoms shared with another ring system
/// are left in place.
pub fn fragment(scaffold: &Scaffold, merge_spiro: bool) -> Vec<Scaffold> {
    let mol = scaffold.mol();
    let systems = ring_systems(mol, merge_spiro);
    if systems.len() <= 1 {
        return Vec::new();
    }
    let expected = systems.len() - 1;

    let mut owners = vec![0usize; mol.atom_count()];
    for system in &systems {
        for atom in system {
            owners[atom.index()] += 1;
        }
    }

    let mut parents = Vec::new();
    for (i, system) in systems.iter().enumerate() {
        let mut keep = vec![true; mol.atom_count()];
        for atom in system {
            if owners[atom.index()] == 1 {
                keep[atom.index()] = false;
            }
        }
        let parent = murcko_scaffold(&extract(mol, &keep));
        if parent.is_empty() || parent.num_components() != 1 {
            trace!("ring system {i}: removal leaves a disconnected framework");
            continue;
        }
        let parent = Scaffold::new(parent, merge_spiro);
        if parent.ring_system_count() != expected {
            trace!(
                "ring system {i}: parent has {} ring systems, expected {expected}",
                parent.ring_system_count()
            );
            continue;
        }
        parents.push(parent);
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::murcko_scaffold;
    use crate::smiles::{from_smiles, to_canonical_smiles};

    fn scaffold(smiles: &str) -> Scaffold {
        Scaffold::new(murcko_scaffold(&from_smiles(smiles).unwrap()), true)
    }

    fn parents(smiles: &str) -> Vec<String> {
        let mut out: Vec<String> = fragment(&scaffold(smiles), true)
            .iter()
            .map(|p| to_canonical_smiles(p.mol()))
            .collect();
        out.sort();
        out
    }

    fn canon(smiles: &str) -> String {
        to_canonical_smiles(&from_smiles(smiles).unwrap())
    }

    #[test]
    fn single_ring_system_has_no_parents() {
        assert!(parents("c1ccc2ccccc2c1").is_empty());
        assert!(parents("c1ccccc1").is_empty());
    }

    #[test]
    fn two_systems_give_both_halves() {
        let mut expected = vec![canon("c1ccccc1"), canon("C1CCNCC1")];
        expected.sort();
        assert_eq!(parents("c1ccccc1CN1CCCCC1"), expected);
    }

    #[test]
    fn inner_system_removal_rejected() {
        let out = parents("c1ccccc1CC1CCC(Cc2ccncc2)CC1");
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.contains('1')));
        for parent in &out {
            let mol = from_smiles(parent).unwrap();
            assert_eq!(mol.num_components(), 1);
        }
    }

    #[test]
    fn exocyclic_linker_double_bond_survives() {
        let mut expected = vec![canon("C=C1C(=O)Nc2ccccc21"), canon("c1cc[nH]c1")];
        expected.sort();
        assert_eq!(parents("O=C1Nc2ccccc2C1=Cc1ccc[nH]1"), expected);
    }

    #[test]
    fn parents_have_one_system_fewer() {
        let top = scaffold("c1ccc(-c2ccc(-c3ccncc3)cc2)cc1");
        assert_eq!(top.ring_system_count(), 3);
        for parent in fragment(&top, true) {
            assert_eq!(parent.ring_system_count(), 2);
        }
    }

    #[test]
    fn spiro_atom_kept_without_merging() {
        let top = scaffold("C1CCC2(CC1)CCNCC2");
        assert_eq!(top.ring_system_count(), 1);
        let split = Scaffold::new(top.mol().clone(), false);
        assert_eq!(split.ring_system_count(), 2);
        for parent in fragment(&split, false) {
            assert_eq!(parent.ring_system_count(), 1);
        }
    }
}
