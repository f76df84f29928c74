//! Conversion of topologies into simulation-ready snapshots and force terms.
//!
//! Snapshot positions are centered on the box center and expressed in Å divided by
//! the reference distance. Force-term parameters are reduced by the same
//! [`ReferenceValues`], so a snapshot and its force terms are always consistent.

use crate::core::forcefield::typed::{LjParams, TypedTopology};
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::units::{ANGSTROMS_PER_NM, ReferenceValues};
use serde::Serialize;
use slotmap::SecondaryMap;
use std::collections::{BTreeMap, BTreeSet};

/// Neighbor-list buffer distance, in snapshot distance units.
pub const NEIGHBOR_BUFFER: f64 = 0.4;
pub const PPPM_RESOLUTION: [u32; 3] = [8, 8, 8];
pub const PPPM_ORDER: u32 = 4;
pub const LJ_EXCLUSIONS: [&str; 3] = ["bond", "1-3", "1-4"];

/// One kind of particle group (bonds, angles, dihedrals or 1-4 pairs).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GroupData {
    /// Sorted unique group type names, e.g. `"CT-HC"`.
    pub types: Vec<String>,
    pub typeid: Vec<usize>,
    /// Particle indices of each group member.
    pub group: Vec<Vec<usize>>,
}

impl GroupData {
    pub fn len(&self) -> usize {
        self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }
}

/// The particle state handed to a simulation engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(rename = "N")]
    pub n_particles: usize,
    #[serde(rename = "box")]
    pub box_lengths: [f64; 3],
    pub types: Vec<String>,
    pub typeid: Vec<usize>,
    pub mass: Vec<f64>,
    pub charge: Vec<f64>,
    pub position: Vec<[f64; 3]>,
    pub bonds: GroupData,
    pub angles: GroupData,
    pub dihedrals: GroupData,
    pub pairs: GroupData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCoeff {
    pub types: [String; 2],
    pub sigma: f64,
    pub epsilon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondCoeff {
    #[serde(rename = "type")]
    pub bond_type: String,
    pub k: f64,
    pub r0: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleCoeff {
    #[serde(rename = "type")]
    pub angle_type: String,
    pub k: f64,
    /// Radians.
    pub t0: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DihedralCoeff {
    #[serde(rename = "type")]
    pub dihedral_type: String,
    pub k: f64,
    pub d: f64,
    pub n: u32,
    /// Radians.
    pub phi0: f64,
}

/// One interaction of the parameter set, in reduced units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ForceTerm {
    LennardJones {
        r_cut: f64,
        buffer: f64,
        exclusions: Vec<String>,
        pairs: Vec<PairCoeff>,
    },
    SpecialPairLj {
        scale: f64,
        pairs: Vec<PairCoeff>,
    },
    SpecialPairCoulomb {
        scale: f64,
        types: Vec<String>,
    },
    Coulomb {
        r_cut: f64,
        resolution: [u32; 3],
        order: u32,
    },
    HarmonicBond {
        coeffs: Vec<BondCoeff>,
    },
    HarmonicAngle {
        coeffs: Vec<AngleCoeff>,
    },
    PeriodicDihedral {
        coeffs: Vec<DihedralCoeff>,
    },
}

impl ForceTerm {
    pub fn kind(&self) -> &'static str {
        match self {
            ForceTerm::LennardJones { .. } => "lennard-jones",
            ForceTerm::SpecialPairLj { .. } => "special-pair-lj",
            ForceTerm::SpecialPairCoulomb { .. } => "special-pair-coulomb",
            ForceTerm::Coulomb { .. } => "coulomb",
            ForceTerm::HarmonicBond { .. } => "harmonic-bond",
            ForceTerm::HarmonicAngle { .. } => "harmonic-angle",
            ForceTerm::PeriodicDihedral { .. } => "periodic-dihedral",
        }
    }
}

/// Output of [`export_typed`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExport {
    pub snapshot: Snapshot,
    pub forcefield: Vec<ForceTerm>,
    pub reference_values: ReferenceValues,
}

/// Builds a snapshot of an untyped topology, with atom names as particle types.
pub fn export_untyped(graph: &MolecularGraph, reference_values: &ReferenceValues) -> Snapshot {
    build_snapshot(graph, reference_values)
}

/// Reference values for a typed topology: the largest σ, ε and particle mass present.
///
/// A maximum that is not strictly positive (e.g. all ε = 0) falls back to 1.
pub fn typed_reference_values(typed: &TypedTopology) -> ReferenceValues {
    ReferenceValues {
        distance: positive_max(typed.atom_types().values().map(|p| p.sigma)),
        mass: positive_max(typed.atoms().map(|(_, a)| a.mass)),
        energy: positive_max(typed.atom_types().values().map(|p| p.epsilon)),
    }
}

fn positive_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() && max > 0.0 { max } else { 1.0 }
}

/// Builds the snapshot, force terms and reference values of a typed topology.
pub fn export_typed(typed: &TypedTopology, r_cut: f64, scale_parameters: bool) -> TypedExport {
    let refs = if scale_parameters {
        typed_reference_values(typed)
    } else {
        ReferenceValues::default()
    };
    let snapshot = build_snapshot(typed.graph(), &refs);
    let forcefield = build_force_terms(typed, &snapshot, &refs, r_cut);
    TypedExport {
        snapshot,
        forcefield,
        reference_values: refs,
    }
}

/// Charges always go through [`ReferenceValues::charge_factor`], so the Coulomb
/// term can assume a unit prefactor even when every reference value is 1.
fn build_snapshot(graph: &MolecularGraph, refs: &ReferenceValues) -> Snapshot {
    let charge_factor = refs.charge_factor();
    let mut index: SecondaryMap<AtomId, usize> = SecondaryMap::new();
    for (i, (id, _)) in graph.atoms_iter().enumerate() {
        index.insert(id, i);
    }
    let names: Vec<&str> = graph.atoms_iter().map(|(_, a)| a.type_name()).collect();
    let types = sorted_unique(names.iter().copied());
    let typeid = names.iter().map(|name| position_of(&types, name)).collect();

    let half_box = graph.sim_box().center();
    let scale = ANGSTROMS_PER_NM / refs.distance;
    let position = graph
        .atoms_iter()
        .map(|(_, a)| {
            let p = (a.position.coords - half_box) * scale;
            [p.x, p.y, p.z]
        })
        .collect();

    let bonds = graph.bonds().iter().map(|b| b.atoms());
    let angles = graph.angles().iter().map(|a| a.atoms);
    let dihedrals = graph.dihedrals().iter().map(|d| d.atoms);
    let mut seen_pairs = BTreeSet::new();
    let pairs = graph
        .dihedrals()
        .iter()
        .map(|d| [d.atoms[0], d.atoms[3]])
        .filter(|&[a, b]| {
            let key = match (index.get(a), index.get(b)) {
                (Some(&i), Some(&j)) => (i.min(j), i.max(j)),
                _ => return false,
            };
            seen_pairs.insert(key)
        })
        .collect::<Vec<_>>();

    Snapshot {
        n_particles: names.len(),
        box_lengths: graph.sim_box().lengths().map(|l| l * scale),
        typeid,
        mass: graph.atoms_iter().map(|(_, a)| a.mass / refs.mass).collect(),
        charge: graph
            .atoms_iter()
            .map(|(_, a)| a.charge * charge_factor)
            .collect(),
        position,
        bonds: group_data(bonds, &index, &names),
        angles: group_data(angles, &index, &names),
        dihedrals: group_data(dihedrals, &index, &names),
        pairs: group_data(pairs.into_iter(), &index, &names),
        types,
    }
}

fn build_force_terms(
    typed: &TypedTopology,
    snapshot: &Snapshot,
    refs: &ReferenceValues,
    r_cut: f64,
) -> Vec<ForceTerm> {
    let globals = typed.globals();
    let reduce = |p: &LjParams| LjParams {
        sigma: p.sigma / refs.distance,
        epsilon: p.epsilon / refs.energy,
    };
    let lj_pair = |a: &str, b: &str, scale: f64| -> Option<PairCoeff> {
        let (pa, pb) = (typed.atom_types().get(a)?, typed.atom_types().get(b)?);
        let mixed = reduce(&globals.combining_rule.mix(pa, pb));
        Some(PairCoeff {
            types: [a.to_string(), b.to_string()],
            sigma: mixed.sigma,
            epsilon: mixed.epsilon * scale,
        })
    };

    let type_names: Vec<&str> = typed.atom_types().keys().map(String::as_str).collect();
    let pairs = type_names
        .iter()
        .enumerate()
        .flat_map(|(i, a)| type_names[i..].iter().map(move |b| (*a, *b)))
        .filter_map(|(a, b)| lj_pair(a, b, 1.0))
        .collect();

    let mut terms = vec![ForceTerm::LennardJones {
        r_cut,
        buffer: NEIGHBOR_BUFFER,
        exclusions: LJ_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        pairs,
    }];

    let charged = snapshot.charge.iter().any(|&q| q != 0.0);
    if !snapshot.pairs.is_empty() {
        let graph = typed.graph();
        let mut special: BTreeMap<String, PairCoeff> = BTreeMap::new();
        for dihedral in typed.dihedral_terms() {
            let ends = [dihedral.atoms[0], dihedral.atoms[3]];
            let names = ends.map(|id| graph.atom(id).map_or("", |a| a.type_name()));
            let (key, oriented) = canonical(&names);
            if special.contains_key(&key) {
                continue;
            }
            if let Some(coeff) = lj_pair(oriented[0], oriented[1], globals.lj14_scale) {
                special.insert(key, coeff);
            }
        }
        terms.push(ForceTerm::SpecialPairLj {
            scale: globals.lj14_scale,
            pairs: special.into_values().collect(),
        });
        if charged {
            terms.push(ForceTerm::SpecialPairCoulomb {
                scale: globals.coulomb14_scale,
                types: snapshot.pairs.types.clone(),
            });
        }
    }
    if charged {
        terms.push(ForceTerm::Coulomb {
            r_cut,
            resolution: PPPM_RESOLUTION,
            order: PPPM_ORDER,
        });
    }

    let graph = typed.graph();
    let names_of = |ids: &[AtomId]| -> Vec<&str> {
        ids.iter()
            .map(|&id| graph.atom(id).map_or("", |a| a.type_name()))
            .collect()
    };

    let mut bonds: BTreeMap<String, BondCoeff> = BTreeMap::new();
    for term in typed.bond_terms() {
        let (key, _) = canonical(&names_of(&term.atoms));
        bonds.entry(key.clone()).or_insert_with(|| BondCoeff {
            bond_type: key,
            k: term.k * refs.distance.powi(2) / refs.energy,
            r0: term.r0 / refs.distance,
        });
    }
    if !bonds.is_empty() {
        terms.push(ForceTerm::HarmonicBond {
            coeffs: bonds.into_values().collect(),
        });
    }

    let mut angles: BTreeMap<String, AngleCoeff> = BTreeMap::new();
    for term in typed.angle_terms() {
        let (key, _) = canonical(&names_of(&term.atoms));
        angles.entry(key.clone()).or_insert_with(|| AngleCoeff {
            angle_type: key,
            k: term.k / refs.energy,
            t0: term.theta0.to_radians(),
        });
    }
    if !angles.is_empty() {
        terms.push(ForceTerm::HarmonicAngle {
            coeffs: angles.into_values().collect(),
        });
    }

    let mut dihedrals: BTreeMap<String, DihedralCoeff> = BTreeMap::new();
    for term in typed.dihedral_terms() {
        let (key, _) = canonical(&names_of(&term.atoms));
        dihedrals.entry(key.clone()).or_insert_with(|| DihedralCoeff {
            dihedral_type: key,
            k: term.k / refs.energy,
            d: term.d,
            n: term.n,
            phi0: term.phi0.to_radians(),
        });
    }
    if !dihedrals.is_empty() {
        terms.push(ForceTerm::PeriodicDihedral {
            coeffs: dihedrals.into_values().collect(),
        });
    }

    terms
}

/// Orients a type sequence so that it reads lexicographically smallest, and joins it with `-`.
fn canonical<'a>(names: &[&'a str]) -> (String, Vec<&'a str>) {
    let forward = names.to_vec();
    let reversed: Vec<&str> = names.iter().rev().copied().collect();
    let oriented = if reversed < forward { reversed } else { forward };
    (oriented.join("-"), oriented)
}

fn group_data<const N: usize>(
    members: impl Iterator<Item = [AtomId; N]>,
    index: &SecondaryMap<AtomId, usize>,
    names: &[&str],
) -> GroupData {
    let mut keys = Vec::new();
    let mut group = Vec::new();
    for ids in members {
        let Some(mut indices) = ids
            .iter()
            .map(|&id| index.get(id).copied())
            .collect::<Option<Vec<usize>>>()
        else {
            continue;
        };
        let member_names: Vec<&str> = indices.iter().map(|&i| names[i]).collect();
        let (key, oriented) = canonical(&member_names);
        if oriented != member_names {
            indices.reverse();
        }
        keys.push(key);
        group.push(indices);
    }

    let types = sorted_unique(keys.iter().map(String::as_str));
    let typeid = keys.iter().map(|k| position_of(&types, k)).collect();
    GroupData {
        types,
        typeid,
        group,
    }
}

fn sorted_unique<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

fn position_of(sorted: &[String], name: &str) -> usize {
    sorted
        .binary_search_by(|t| t.as_str().cmp(name))
        .unwrap_or_else(|i| i)
}
