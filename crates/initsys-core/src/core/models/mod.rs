//! # Core Models Module
//!
//! Data structures describing molecules at each stage of system construction.
//!
//! - [`molecule`] - Caller-owned molecule templates and replicated molecule sets
//! - [`structure`] - The untyped geometric assembly and its simulation box
//! - [`graph`] - The connectivity-aware topology (atoms, residues, bonds, angles, dihedrals)
//! - [`atom`] - Template particles and topology atoms
//! - [`residue`] - Molecule instances inside a topology
//! - [`topology`] - Bond, angle and dihedral connection types
//! - [`element`] - Static per-element data used for typing and bond perception
//! - [`ids`] - Stable identifiers for atoms and residues

pub mod atom;
pub mod element;
pub mod graph;
pub mod ids;
pub mod molecule;
pub mod residue;
pub mod structure;
pub mod topology;
