use super::params::{AtomTypeRule, Forcefield};
use super::typed::{AngleTerm, BondTerm, DihedralTerm, LjParams, TypedTopology};
use crate::core::models::atom::Atom;
use crate::core::models::element;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypingError {
    #[error("No atom type rule matches atom '{atom_name}' of residue '{residue_name}'")]
    UnmatchedAtom {
        atom_name: String,
        residue_name: String,
    },
    #[error("Missing non-bonded parameters for atom type '{ff_type}'")]
    MissingNonBondedParams { ff_type: String },
    #[error("Missing bond parameters for types {types}")]
    MissingBondParams { types: String },
    #[error("Missing angle parameters for types {types}")]
    MissingAngleParams { types: String },
    #[error("Missing dihedral parameters for types {types}")]
    MissingDihedralParams { types: String },
}

/// Anything that can turn an untyped topology into a typed one.
pub trait ForcefieldApplicator {
    /// Types every atom of `graph` and assigns bonded parameters.
    ///
    /// With `use_residue_map`, the first instance of each residue is typed atom by
    /// atom and later instances with the same atom names reuse its assignments.
    fn apply(
        &self,
        graph: &MolecularGraph,
        use_residue_map: bool,
    ) -> Result<TypedTopology, TypingError>;
}

#[derive(Debug, Clone, PartialEq)]
struct Assignment {
    atom_name: String,
    ff_type: String,
    mass: f64,
    charge: f64,
}

impl ForcefieldApplicator for Forcefield {
    fn apply(
        &self,
        graph: &MolecularGraph,
        use_residue_map: bool,
    ) -> Result<TypedTopology, TypingError> {
        let mut typed = graph.clone();
        let mut residue_map: HashMap<String, Vec<Assignment>> = HashMap::new();
        let mut reused = 0usize;

        for (_, residue) in graph.residues_iter() {
            let cached = residue_map.get(&residue.name).filter(|cached| {
                cached.len() == residue.atoms().len()
                    && cached.iter().zip(residue.atoms()).all(|(a, &id)| {
                        graph.atom(id).is_some_and(|atom| atom.name == a.atom_name)
                    })
            });

            let assignments = match cached {
                Some(cached) => {
                    reused += 1;
                    cached.clone()
                }
                None => residue
                    .atoms()
                    .iter()
                    .map(|&id| self.type_atom(graph, id, &residue.name))
                    .collect::<Result<Vec<_>, _>>()?,
            };

            for (&id, assignment) in residue.atoms().iter().zip(&assignments) {
                if let Some(atom) = typed.atom_mut(id) {
                    atom.force_field_type = Some(assignment.ff_type.clone());
                    atom.mass = assignment.mass;
                    atom.charge = assignment.charge;
                }
            }

            if use_residue_map && !residue_map.contains_key(&residue.name) {
                residue_map.insert(residue.name.clone(), assignments);
            }
        }
        debug!(
            residues = graph.n_residues(),
            reused, "Atom typing finished."
        );

        let atom_types = self.collect_atom_types(&typed)?;
        let bond_terms = self.collect_bond_terms(&typed)?;
        let angle_terms = self.collect_angle_terms(&typed)?;
        let dihedral_terms = self.collect_dihedral_terms(&typed)?;

        Ok(TypedTopology {
            graph: typed,
            atom_types,
            bond_terms,
            angle_terms,
            dihedral_terms,
            globals: self.globals.clone(),
        })
    }
}

impl Forcefield {
    fn type_atom(
        &self,
        graph: &MolecularGraph,
        atom_id: AtomId,
        residue_name: &str,
    ) -> Result<Assignment, TypingError> {
        // Atom IDs come from the residue's own atom list.
        let atom = graph.atom(atom_id).ok_or_else(|| TypingError::UnmatchedAtom {
            atom_name: String::from("<missing>"),
            residue_name: residue_name.to_string(),
        })?;
        let degree = graph.degree(atom_id);

        let rule = self
            .atom_types
            .iter()
            .find(|rule| rule_matches(rule, atom, degree, residue_name))
            .ok_or_else(|| TypingError::UnmatchedAtom {
                atom_name: atom.name.clone(),
                residue_name: residue_name.to_string(),
            })?;

        Ok(Assignment {
            atom_name: atom.name.clone(),
            ff_type: rule.name.clone(),
            mass: rule.mass.unwrap_or(atom.mass),
            charge: rule.charge.unwrap_or(atom.charge),
        })
    }

    fn collect_atom_types(
        &self,
        graph: &MolecularGraph,
    ) -> Result<BTreeMap<String, LjParams>, TypingError> {
        let mut atom_types = BTreeMap::new();
        for (_, atom) in graph.atoms_iter() {
            let ff_type = atom.type_name();
            if atom_types.contains_key(ff_type) {
                continue;
            }
            let param = self.non_bonded.get(ff_type).ok_or_else(|| {
                TypingError::MissingNonBondedParams {
                    ff_type: ff_type.to_string(),
                }
            })?;
            atom_types.insert(
                ff_type.to_string(),
                LjParams {
                    sigma: param.sigma,
                    epsilon: param.epsilon,
                },
            );
        }
        Ok(atom_types)
    }

    fn collect_bond_terms(&self, graph: &MolecularGraph) -> Result<Vec<BondTerm>, TypingError> {
        graph
            .bonds()
            .iter()
            .map(|bond| {
                let atoms = bond.atoms();
                let types = type_names(graph, &atoms);
                let param = self
                    .bond_param([types[0], types[1]])
                    .ok_or_else(|| TypingError::MissingBondParams {
                        types: types.join("-"),
                    })?;
                Ok(BondTerm {
                    atoms,
                    k: param.k,
                    r0: param.r0,
                })
            })
            .collect()
    }

    fn collect_angle_terms(&self, graph: &MolecularGraph) -> Result<Vec<AngleTerm>, TypingError> {
        graph
            .angles()
            .iter()
            .map(|angle| {
                let types = type_names(graph, &angle.atoms);
                let param = self
                    .angle_param([types[0], types[1], types[2]])
                    .ok_or_else(|| TypingError::MissingAngleParams {
                        types: types.join("-"),
                    })?;
                Ok(AngleTerm {
                    atoms: angle.atoms,
                    k: param.k,
                    theta0: param.theta0,
                })
            })
            .collect()
    }

    fn collect_dihedral_terms(
        &self,
        graph: &MolecularGraph,
    ) -> Result<Vec<DihedralTerm>, TypingError> {
        graph
            .dihedrals()
            .iter()
            .map(|dihedral| {
                let types = type_names(graph, &dihedral.atoms);
                let param = self
                    .dihedral_param([types[0], types[1], types[2], types[3]])
                    .ok_or_else(|| TypingError::MissingDihedralParams {
                        types: types.join("-"),
                    })?;
                Ok(DihedralTerm {
                    atoms: dihedral.atoms,
                    k: param.k,
                    d: param.d,
                    n: param.n,
                    phi0: param.phi0,
                })
            })
            .collect()
    }
}

fn rule_matches(rule: &AtomTypeRule, atom: &Atom, degree: usize, residue_name: &str) -> bool {
    let element_ok = rule.element.as_deref().is_none_or(|symbol| {
        element::lookup(symbol).is_some_and(|info| info.atomic_number == atom.atomic_number)
    });
    let particle_ok = rule.particle.as_deref().is_none_or(|name| name == atom.name);
    let neighbors_ok = rule.neighbors.is_none_or(|n| n == degree);
    let residue_ok = rule.residue.as_deref().is_none_or(|r| r == residue_name);
    element_ok && particle_ok && neighbors_ok && residue_ok
}

fn type_names<'a>(graph: &'a MolecularGraph, ids: &[AtomId]) -> Vec<&'a str> {
    ids.iter()
        .map(|&id| graph.atom(id).map_or("", Atom::type_name))
        .collect()
}
