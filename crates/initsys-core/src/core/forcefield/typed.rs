use super::params::GlobalParams;
use crate::core::models::atom::Atom;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use std::collections::BTreeMap;

/// Lennard-Jones parameters of one atom type (Å, kcal/mol).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LjParams {
    pub sigma: f64,
    pub epsilon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerm {
    pub atoms: [AtomId; 2],
    pub k: f64,
    pub r0: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTerm {
    pub atoms: [AtomId; 3],
    pub k: f64,
    /// Degrees.
    pub theta0: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DihedralTerm {
    pub atoms: [AtomId; 4],
    pub k: f64,
    pub d: f64,
    pub n: u32,
    /// Degrees.
    pub phi0: f64,
}

/// A topology with force field types, masses, charges and bonded parameters assigned.
#[derive(Debug, Clone)]
pub struct TypedTopology {
    pub(crate) graph: MolecularGraph,
    pub(crate) atom_types: BTreeMap<String, LjParams>,
    pub(crate) bond_terms: Vec<BondTerm>,
    pub(crate) angle_terms: Vec<AngleTerm>,
    pub(crate) dihedral_terms: Vec<DihedralTerm>,
    pub(crate) globals: GlobalParams,
}

impl TypedTopology {
    pub fn graph(&self) -> &MolecularGraph {
        &self.graph
    }

    /// Atoms in topology order.
    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.graph.atoms_iter()
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.graph.atom_mut(id)
    }

    pub fn atoms_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.graph.atoms_iter_mut()
    }

    /// Bonded partners of an atom, in bond order.
    pub fn bond_partners(&self, id: AtomId) -> &[AtomId] {
        self.graph.get_bonded_neighbors(id).unwrap_or(&[])
    }

    pub fn n_atoms(&self) -> usize {
        self.graph.n_atoms()
    }

    pub fn mass(&self) -> f64 {
        self.graph.mass()
    }

    pub fn net_charge(&self) -> f64 {
        self.graph.net_charge()
    }

    pub fn charges(&self) -> Vec<f64> {
        self.atoms().map(|(_, a)| a.charge).collect()
    }

    /// Lennard-Jones parameters keyed by the atom types currently present.
    pub fn atom_types(&self) -> &BTreeMap<String, LjParams> {
        &self.atom_types
    }

    pub fn bond_terms(&self) -> &[BondTerm] {
        &self.bond_terms
    }

    pub fn angle_terms(&self) -> &[AngleTerm] {
        &self.angle_terms
    }

    pub fn dihedral_terms(&self) -> &[DihedralTerm] {
        &self.dihedral_terms
    }

    pub fn globals(&self) -> &GlobalParams {
        &self.globals
    }

    /// Removes every atom matching `predicate` along with all terms touching it.
    ///
    /// Atom types no longer used by any atom are dropped. Returns the number of atoms removed.
    pub fn strip(&mut self, predicate: impl Fn(&Atom) -> bool) -> usize {
        let doomed: Vec<AtomId> = self
            .graph
            .atoms_iter()
            .filter(|(_, atom)| predicate(atom))
            .map(|(id, _)| id)
            .collect();
        for &id in &doomed {
            self.graph.remove_atom(id);
        }

        let graph = &self.graph;
        let alive = |ids: &[AtomId]| ids.iter().all(|&id| graph.atom(id).is_some());
        self.bond_terms.retain(|t| alive(&t.atoms));
        self.angle_terms.retain(|t| alive(&t.atoms));
        self.dihedral_terms.retain(|t| alive(&t.atoms));

        let used: std::collections::HashSet<&str> =
            graph.atoms_iter().map(|(_, a)| a.type_name()).collect();
        self.atom_types.retain(|name, _| used.contains(name.as_str()));

        doomed.len()
    }
}
