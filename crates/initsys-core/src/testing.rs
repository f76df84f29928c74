//! Shared fixtures for unit tests.

use crate::core::forcefield::params::Forcefield;
use crate::core::models::atom::Particle;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::engine::assembly::{Assembler, LatticeAssembler};
use crate::engine::convert::TopologyConverter;
use nalgebra::Point3;
use std::sync::Arc;

const ALKANE_DEFINITION: &str = r#"
[[atom-types]]
name = "CT"
element = "C"
neighbors = 4
charge = -0.24

[[atom-types]]
name = "HC"
element = "H"
charge = 0.06

[[bonds]]
types = ["CT", "HC"]
k = 340.0
r0 = 1.09

[[bonds]]
types = ["CT", "CT"]
k = 268.0
r0 = 1.529

[[angles]]
types = ["HC", "CT", "HC"]
k = 33.0
theta0 = 107.8

[[angles]]
types = ["HC", "CT", "CT"]
k = 37.5
theta0 = 110.7

[[dihedrals]]
types = ["*", "CT", "CT", "*"]
k = 0.3
n = 3
"#;

const ALKANE_NON_BONDED: &str = "type,sigma,epsilon\nCT,3.5,0.066\nHC,2.5,0.03\n";

const BEAD_DEFINITION: &str = r#"
[[atom-types]]
name = "_A"
particle = "A"

[[atom-types]]
name = "_B"
particle = "B"

[[bonds]]
types = ["_A", "_B"]
k = 100.0
r0 = 4.0
"#;

const BEAD_NON_BONDED: &str = "type,sigma,epsilon\n_A,4.0,1.0\n_B,3.0,0.5\n";

fn element(name: &str, symbol: &str, x: f64, y: f64, z: f64) -> Particle {
    Particle::from_element(name, symbol, Point3::new(x, y, z)).unwrap()
}

/// CH4 with C first and no explicit bonds.
pub fn methane() -> Molecule {
    let d = 0.0629;
    let mut mol = Molecule::new("CH4");
    mol.add_particle(element("C", "C", 0.0, 0.0, 0.0));
    mol.add_particle(element("H1", "H", d, d, d));
    mol.add_particle(element("H2", "H", -d, -d, d));
    mol.add_particle(element("H3", "H", -d, d, -d));
    mol.add_particle(element("H4", "H", d, -d, -d));
    mol
}

/// Staggered C2H6 with no explicit bonds.
pub fn ethane() -> Molecule {
    let (cc, dx, r) = (0.153, 0.0363, 0.1027);
    let mut mol = Molecule::new("C2H6");
    mol.add_particle(element("C1", "C", 0.0, 0.0, 0.0));
    mol.add_particle(element("C2", "C", cc, 0.0, 0.0));
    for (i, deg) in [0.0f64, 120.0, 240.0].into_iter().enumerate() {
        let (s, c) = deg.to_radians().sin_cos();
        mol.add_particle(element(&format!("H1{i}"), "H", -dx, r * c, r * s));
    }
    for (i, deg) in [60.0f64, 180.0, 300.0].into_iter().enumerate() {
        let (s, c) = deg.to_radians().sin_cos();
        mol.add_particle(element(&format!("H2{i}"), "H", cc + dx, r * c, r * s));
    }
    mol
}

/// Charged H2O with O first and explicit O-H bonds.
pub fn water() -> Molecule {
    let mut mol = Molecule::new("HOH");
    let o = mol.add_particle(element("O", "O", 0.0, 0.0, 0.0).with_charge(-0.834));
    let h1 = mol.add_particle(element("H1", "H", 0.0957, 0.0, 0.0).with_charge(0.417));
    let h2 = mol.add_particle(element("H2", "H", -0.024, 0.0927, 0.0).with_charge(0.417));
    mol.add_bond(o, h1, BondOrder::Single).unwrap();
    mol.add_bond(o, h2, BondOrder::Single).unwrap();
    mol
}

/// Two element-less beads `A`-`B` joined by an explicit bond.
pub fn bead_dimer() -> Molecule {
    let mut mol = Molecule::new("CG");
    let a = mol.add_particle(Particle::bead("A", 30.0, Point3::new(0.0, 0.0, 0.0)));
    let b = mol.add_particle(Particle::bead("B", 45.0, Point3::new(0.4, 0.0, 0.0)));
    mol.add_bond(a, b, BondOrder::Single).unwrap();
    mol
}

fn graph_of(template: Molecule, n: usize) -> MolecularGraph {
    templates_graph(vec![template; n])
}

/// One residue per template, in order, on a 1 nm lattice.
pub fn templates_graph(templates: Vec<Molecule>) -> MolecularGraph {
    let molecules: Vec<_> = templates.into_iter().map(Arc::new).collect();
    let structure = LatticeAssembler::new(1.0).assemble(&molecules).unwrap();
    TopologyConverter::default().convert(&structure)
}

pub fn methane_graph(n: usize) -> MolecularGraph {
    graph_of(methane(), n)
}

pub fn ethane_graph(n: usize) -> MolecularGraph {
    graph_of(ethane(), n)
}

pub fn water_graph(n: usize) -> MolecularGraph {
    graph_of(water(), n)
}

pub fn bead_graph(n: usize) -> MolecularGraph {
    graph_of(bead_dimer(), n)
}

pub fn alkane_forcefield() -> Forcefield {
    Forcefield::parse(ALKANE_DEFINITION, ALKANE_NON_BONDED).unwrap()
}

pub fn bead_forcefield() -> Forcefield {
    Forcefield::parse(BEAD_DEFINITION, BEAD_NON_BONDED).unwrap()
}
