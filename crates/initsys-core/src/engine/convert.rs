use crate::core::models::atom::Atom;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::structure::Structure;
use crate::core::models::topology::BondOrder;
use crate::core::units::ANGSTROMS_PER_NM;
use tracing::debug;

pub const DEFAULT_BOND_TOLERANCE: f64 = 1.2;

/// Converts a placed [`Structure`] into a connectivity-aware [`MolecularGraph`].
///
/// Each molecule becomes one residue named after its template. Template bonds are
/// kept and further bonds are perceived from covalent radii inside each molecule,
/// never across molecules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyConverter {
    /// Multiplier applied to the sum of covalent radii when perceiving bonds.
    pub tolerance: f64,
}

impl Default for TopologyConverter {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_BOND_TOLERANCE,
        }
    }
}

impl TopologyConverter {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn convert(&self, structure: &Structure) -> MolecularGraph {
        let mut graph = MolecularGraph::new(*structure.sim_box());
        let mut perceived = 0usize;

        for molecule in structure.molecules() {
            let ids = add_molecule(&mut graph, molecule);
            perceived += self.perceive_bonds(&mut graph, &ids);
        }
        graph.identify_connections();

        debug!(
            atoms = graph.n_atoms(),
            bonds = graph.bonds().len(),
            perceived,
            angles = graph.angles().len(),
            dihedrals = graph.dihedrals().len(),
            "Converted structure to topology."
        );
        graph
    }

    /// Adds bonds between close atom pairs, nearest pairs first. Returns the number added.
    fn perceive_bonds(&self, graph: &mut MolecularGraph, ids: &[AtomId]) -> usize {
        let mut candidates: Vec<(AtomId, AtomId, f64)> = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if graph.has_bond(a, b) {
                    continue;
                }
                if let Some(distance) = self.bonding_distance(graph, a, b) {
                    candidates.push((a, b, distance));
                }
            }
        }
        candidates.sort_by(|x, y| x.2.total_cmp(&y.2));

        let mut added = 0;
        for (a, b, _) in candidates {
            if has_free_valence(graph, a)
                && has_free_valence(graph, b)
                && graph.add_bond(a, b, BondOrder::Single).is_some()
            {
                added += 1;
            }
        }
        added
    }

    /// Distance in Å between two atoms if it is within bonding range.
    fn bonding_distance(&self, graph: &MolecularGraph, a: AtomId, b: AtomId) -> Option<f64> {
        let (atom_a, atom_b) = (graph.atom(a)?, graph.atom(b)?);
        let (el_a, el_b) = (atom_a.element()?, atom_b.element()?);
        let distance = nalgebra::distance(&atom_a.position, &atom_b.position) * ANGSTROMS_PER_NM;
        let cutoff = (el_a.covalent_radius + el_b.covalent_radius) * self.tolerance;
        (distance <= cutoff).then_some(distance)
    }
}

fn add_molecule(graph: &mut MolecularGraph, molecule: &Molecule) -> Vec<AtomId> {
    let residue_id = graph.add_residue(&molecule.name);
    let ids: Vec<AtomId> = molecule
        .particles()
        .iter()
        .filter_map(|p| graph.add_atom_to_residue(residue_id, Atom::from_particle(p, residue_id)))
        .collect();
    for bond in molecule.bonds() {
        if let (Some(&a), Some(&b)) = (ids.get(bond.i), ids.get(bond.j)) {
            graph.add_bond(a, b, bond.order);
        }
    }
    ids
}

/// Whether one more single bond fits within the element's maximum valence.
fn has_free_valence(graph: &MolecularGraph, id: AtomId) -> bool {
    graph
        .atom(id)
        .and_then(Atom::element)
        .is_some_and(|el| graph.bond_valence(id) + 1.0 <= f64::from(el.max_valence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Particle;
    use crate::core::models::structure::SimBox;
    use crate::testing;
    use nalgebra::Point3;

    fn atom_ids(graph: &MolecularGraph) -> Vec<AtomId> {
        graph.atoms_iter().map(|(id, _)| id).collect()
    }

    fn structure_of(molecules: Vec<Molecule>) -> Structure {
        Structure::new(molecules, SimBox::cubic(5.0).unwrap())
    }

    #[test]
    fn perceives_methane_bonds_and_connections() {
        let graph = TopologyConverter::default().convert(&structure_of(vec![testing::methane()]));
        assert_eq!(graph.n_residues(), 1);
        assert_eq!(graph.n_atoms(), 5);
        assert_eq!(graph.bonds().len(), 4);
        assert_eq!(graph.angles().len(), 6);
        assert!(graph.dihedrals().is_empty());
    }

    #[test]
    fn residues_are_named_after_templates() {
        let graph = TopologyConverter::default()
            .convert(&structure_of(vec![testing::methane(), testing::water()]));
        let names: Vec<_> = graph.residues_iter().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["CH4", "HOH"]);
        assert_eq!(graph.bonds().len(), 4 + 2);
    }

    #[test]
    fn explicit_bonds_are_kept_and_beads_are_never_perceived() {
        let mut dimer = Molecule::new("CG");
        let a = dimer.add_particle(Particle::bead("A", 50.0, Point3::new(0.0, 0.0, 0.0)));
        let b = dimer.add_particle(Particle::bead("B", 50.0, Point3::new(0.05, 0.0, 0.0)));
        let c = dimer.add_particle(Particle::bead("C", 50.0, Point3::new(0.4, 0.0, 0.0)));
        dimer.add_bond(b, c, BondOrder::Single).unwrap();

        let graph = TopologyConverter::default().convert(&structure_of(vec![dimer]));
        assert_eq!(graph.bonds().len(), 1);
        let ids = atom_ids(&graph);
        assert!(!graph.has_bond(ids[a], ids[b]));
        assert!(graph.has_bond(ids[b], ids[c]));
    }

    #[test]
    fn valence_limits_perceived_bonds() {
        // Three hydrogens in bonding range of each other: at most one H-H bond per atom.
        let mut cluster = Molecule::new("H3");
        for (i, x) in [0.0, 0.07, 0.14].into_iter().enumerate() {
            cluster.add_particle(
                Particle::from_element(&format!("H{i}"), "H", Point3::new(x, 0.0, 0.0)).unwrap(),
            );
        }
        let graph = TopologyConverter::default().convert(&structure_of(vec![cluster]));
        let ids = atom_ids(&graph);
        assert_eq!(graph.bonds().len(), 1);
        assert!(ids.iter().all(|&id| graph.degree(id) <= 1));
    }

    #[test]
    fn explicit_bond_order_consumes_valence() {
        let mut carbonyl = Molecule::new("CO");
        let c = carbonyl.add_particle(
            Particle::from_element("C", "C", Point3::new(0.0, 0.0, 0.0)).unwrap(),
        );
        let o = carbonyl.add_particle(
            Particle::from_element("O", "O", Point3::new(0.121, 0.0, 0.0)).unwrap(),
        );
        carbonyl.add_particle(
            Particle::from_element("H", "H", Point3::new(0.217, 0.0, 0.0)).unwrap(),
        );
        carbonyl.add_bond(c, o, BondOrder::Double).unwrap();

        let graph = TopologyConverter::default().convert(&structure_of(vec![carbonyl]));
        let ids = atom_ids(&graph);
        assert_eq!(graph.bonds().len(), 1);
        assert_eq!(graph.bond_valence(ids[1]), 2.0);
        assert_eq!(graph.degree(ids[2]), 0);
    }

    #[test]
    fn bonds_do_not_cross_molecules() {
        let mut left = Molecule::new("H");
        left.add_particle(Particle::from_element("H", "H", Point3::new(0.0, 0.0, 0.0)).unwrap());
        let right = left.translated(&nalgebra::Vector3::new(0.07, 0.0, 0.0));
        let graph = TopologyConverter::default().convert(&structure_of(vec![left, right]));
        assert!(graph.bonds().is_empty());
    }

    #[test]
    fn conversion_is_repeatable() {
        let structure = structure_of(vec![testing::methane(), testing::methane()]);
        let converter = TopologyConverter::default();
        let first = converter.convert(&structure);
        let second = converter.convert(&structure);
        assert_eq!(first.bonds().len(), second.bonds().len());
        assert_eq!(first.angles().len(), second.angles().len());
        assert_eq!(first.n_atoms(), second.n_atoms());
    }
}
