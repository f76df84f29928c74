use super::atom::Atom;
use super::ids::{AtomId, ResidueId};
use super::residue::Residue;
use super::structure::SimBox;
use super::topology::{Angle, Bond, BondOrder, Dihedral};
use slotmap::{SecondaryMap, SlotMap};

/// A connectivity-aware molecular topology.
///
/// Atoms are nodes, bonds are edges; angles and dihedrals are derived from the
/// bond graph by [`identify_connections`](Self::identify_connections).
///
/// Atom iteration follows slot order. That equals insertion order only while no
/// atom is added after a removal: a freed slot is reused by the next insertion.
/// Conversion inserts every atom before typing strips any, so snapshots keep
/// insertion order.
#[derive(Debug, Clone)]
pub struct MolecularGraph {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues (one per molecule instance).
    residues: SlotMap<ResidueId, Residue>,
    bonds: Vec<Bond>,
    angles: Vec<Angle>,
    dihedrals: Vec<Dihedral>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
    sim_box: SimBox,
}

impl MolecularGraph {
    pub fn new(sim_box: SimBox) -> Self {
        Self {
            atoms: SlotMap::with_key(),
            residues: SlotMap::with_key(),
            bonds: Vec::new(),
            angles: Vec::new(),
            dihedrals: Vec::new(),
            bond_adjacency: SecondaryMap::new(),
            sim_box,
        }
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn angles(&self) -> &[Angle] {
        &self.angles
    }

    pub fn dihedrals(&self) -> &[Dihedral] {
        &self.dihedrals
    }

    pub fn sim_box(&self) -> &SimBox {
        &self.sim_box
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_residues(&self) -> usize {
        self.residues.len()
    }

    /// Total mass in amu.
    pub fn mass(&self) -> f64 {
        self.atoms.values().map(|a| a.mass).sum()
    }

    pub fn net_charge(&self) -> f64 {
        self.atoms.values().map(|a| a.charge).sum()
    }

    pub fn add_residue(&mut self, name: &str) -> ResidueId {
        self.residues.insert(Residue::new(name))
    }

    /// Adds an atom to a residue, overwriting `atom.residue_id` with `residue_id`.
    ///
    /// Returns `None` if the residue doesn't exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        let residue = self.residues.get_mut(residue_id)?;
        atom.residue_id = residue_id;
        let atom_id = self.atoms.insert(atom);
        residue.atoms.push(atom_id);
        self.bond_adjacency.insert(atom_id, Vec::new());
        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Idempotent: adding an existing bond succeeds without creating a duplicate.
    /// Returns `None` if either atom doesn't exist or both IDs are equal.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }
        if self.has_bond(atom1_id, atom2_id) {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    pub fn has_bond(&self, atom1_id: AtomId, atom2_id: AtomId) -> bool {
        self.bond_adjacency
            .get(atom1_id)
            .is_some_and(|neighbors| neighbors.contains(&atom2_id))
    }

    /// Bonded neighbors in bond insertion order, or `None` if the atom doesn't exist.
    pub fn get_bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    pub fn degree(&self, atom_id: AtomId) -> usize {
        self.get_bonded_neighbors(atom_id).map_or(0, <[AtomId]>::len)
    }

    /// Sum of bond multiplicities on an atom.
    pub fn bond_valence(&self, atom_id: AtomId) -> f64 {
        self.bonds
            .iter()
            .filter(|bond| bond.contains(atom_id))
            .map(|bond| bond.order.multiplicity())
            .sum()
    }

    /// Removes an atom with every bond, angle and dihedral that references it.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;

        if let Some(residue) = self.residues.get_mut(atom.residue_id) {
            residue.remove_atom(atom_id);
        }

        self.bonds.retain(|bond| !bond.contains(atom_id));
        self.angles.retain(|angle| !angle.contains(atom_id));
        self.dihedrals.retain(|dihedral| !dihedral.contains(atom_id));

        let neighbors = self.bond_adjacency.remove(atom_id).unwrap_or_default();
        for neighbor_id in neighbors {
            if let Some(adjacency) = self.bond_adjacency.get_mut(neighbor_id) {
                adjacency.retain(|&id| id != atom_id);
            }
        }

        Some(atom)
    }

    /// Rebuilds the angle and dihedral lists from the current bonds.
    pub fn identify_connections(&mut self) {
        let mut angles = Vec::new();
        for center in self.atoms.keys() {
            let neighbors = &self.bond_adjacency[center];
            for (i, &a) in neighbors.iter().enumerate() {
                for &c in &neighbors[i + 1..] {
                    angles.push(Angle {
                        atoms: [a, center, c],
                    });
                }
            }
        }

        let mut dihedrals = Vec::new();
        for bond in &self.bonds {
            let [b, c] = bond.atoms();
            for &a in &self.bond_adjacency[b] {
                if a == c {
                    continue;
                }
                for &d in &self.bond_adjacency[c] {
                    if d == b || d == a {
                        continue;
                    }
                    dihedrals.push(Dihedral {
                        atoms: [a, b, c, d],
                    });
                }
            }
        }

        self.angles = angles;
        self.dihedrals = dihedrals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Particle;
    use nalgebra::Point3;

    fn carbon(name: &str) -> Atom {
        let p = Particle::from_element(name, "C", Point3::origin()).unwrap();
        Atom::from_particle(&p, ResidueId::default())
    }

    /// Linear chain C0-C1-C2-C3 in one residue.
    fn butane_backbone() -> (MolecularGraph, Vec<AtomId>) {
        let mut graph = MolecularGraph::new(SimBox::cubic(2.0).unwrap());
        let res = graph.add_residue("BUT");
        let ids: Vec<_> = (0..4)
            .map(|i| {
                graph
                    .add_atom_to_residue(res, carbon(&format!("C{i}")))
                    .unwrap()
            })
            .collect();
        for w in ids.windows(2) {
            graph.add_bond(w[0], w[1], BondOrder::Single).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn add_atom_sets_residue_and_adjacency() {
        let (graph, ids) = butane_backbone();
        let (res_id, residue) = graph.residues_iter().next().unwrap();
        assert_eq!(residue.atoms(), ids.as_slice());
        assert_eq!(graph.atom(ids[0]).unwrap().residue_id, res_id);
        assert_eq!(graph.get_bonded_neighbors(ids[1]).unwrap(), &[ids[0], ids[2]]);
        assert_eq!(graph.degree(ids[3]), 1);
    }

    #[test]
    fn add_atom_to_missing_residue_fails() {
        let (mut graph, _) = butane_backbone();
        assert!(
            graph
                .add_atom_to_residue(ResidueId::default(), carbon("X"))
                .is_none()
        );
    }

    #[test]
    fn add_bond_is_idempotent_and_rejects_self_bonds() {
        let (mut graph, ids) = butane_backbone();
        assert_eq!(graph.bonds().len(), 3);
        graph.add_bond(ids[1], ids[0], BondOrder::Single).unwrap();
        assert_eq!(graph.bonds().len(), 3);
        assert!(graph.add_bond(ids[0], ids[0], BondOrder::Single).is_none());
    }

    #[test]
    fn bond_valence_sums_multiplicities() {
        let (mut graph, ids) = butane_backbone();
        assert_eq!(graph.bond_valence(ids[0]), 1.0);
        assert_eq!(graph.bond_valence(ids[1]), 2.0);
        graph.add_bond(ids[0], ids[2], BondOrder::Double).unwrap();
        assert_eq!(graph.bond_valence(ids[2]), 4.0);
    }

    #[test]
    fn identify_connections_finds_angles_and_dihedrals() {
        let (mut graph, ids) = butane_backbone();
        graph.identify_connections();

        assert_eq!(graph.angles().len(), 2);
        assert!(
            graph
                .angles()
                .iter()
                .any(|a| a.atoms == [ids[0], ids[1], ids[2]])
        );
        assert_eq!(graph.dihedrals().len(), 1);
        assert_eq!(graph.dihedrals()[0].atoms, [ids[0], ids[1], ids[2], ids[3]]);
    }

    #[test]
    fn identify_connections_skips_three_membered_ring_dihedrals() {
        let mut graph = MolecularGraph::new(SimBox::cubic(1.0).unwrap());
        let res = graph.add_residue("CPR");
        let ids: Vec<_> = (0..3)
            .map(|i| graph.add_atom_to_residue(res, carbon(&format!("C{i}"))).unwrap())
            .collect();
        graph.add_bond(ids[0], ids[1], BondOrder::Single).unwrap();
        graph.add_bond(ids[1], ids[2], BondOrder::Single).unwrap();
        graph.add_bond(ids[2], ids[0], BondOrder::Single).unwrap();
        graph.identify_connections();

        assert_eq!(graph.angles().len(), 3);
        assert!(graph.dihedrals().is_empty());
    }

    #[test]
    fn remove_atom_cleans_up_connections() {
        let (mut graph, ids) = butane_backbone();
        graph.identify_connections();

        let removed = graph.remove_atom(ids[0]).unwrap();
        assert_eq!(removed.name, "C0");
        assert_eq!(graph.n_atoms(), 3);
        assert_eq!(graph.bonds().len(), 2);
        assert_eq!(graph.angles().len(), 1);
        assert!(graph.dihedrals().is_empty());
        assert_eq!(graph.get_bonded_neighbors(ids[1]).unwrap(), &[ids[2]]);
        let (_, residue) = graph.residues_iter().next().unwrap();
        assert_eq!(residue.atoms(), &ids[1..]);
        assert!(graph.remove_atom(ids[0]).is_none());
    }

    #[test]
    fn removal_preserves_iteration_order() {
        let (mut graph, ids) = butane_backbone();
        graph.remove_atom(ids[1]);
        let remaining: Vec<_> = graph.atoms_iter().map(|(id, _)| id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn insertion_after_removal_reuses_the_freed_slot() {
        let (mut graph, ids) = butane_backbone();
        let (res, _) = graph.residues_iter().next().unwrap();
        graph.remove_atom(ids[1]);
        let late = graph.add_atom_to_residue(res, carbon("C4")).unwrap();

        let order: Vec<_> = graph.atoms_iter().map(|(_, a)| a.name.as_str()).collect();
        assert_eq!(order, vec!["C0", "C4", "C2", "C3"]);
        assert_ne!(late, ids[1]);
        assert!(graph.atom(ids[1]).is_none());
    }
}
