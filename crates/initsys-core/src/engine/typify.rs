use super::config::ForcefieldOptions;
use super::diagnostics::{Diagnostic, DiagnosticReporter};
use super::export;
use super::state::AppliedForcefield;
use crate::core::forcefield::charges;
use crate::core::forcefield::typed::TypedTopology;
use crate::core::forcefield::typing::{ForcefieldApplicator, TypingError};
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::units::HYDROGEN_MASS_AMU;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Mass window (amu) around [`HYDROGEN_MASS_AMU`] for recognising element-less hydrogens.
pub const HYDROGEN_MASS_TOLERANCE: f64 = 1e-2;

#[derive(Debug, Error, PartialEq)]
pub enum TypifyError {
    #[error(transparent)]
    Typing(#[from] TypingError),
    #[error("Hydrogen '{atom_name}' has no heavy-atom bond partner to absorb its mass and charge")]
    OrphanHydrogen { atom_name: String },
}

/// Applies a force field to a topology and post-processes the typed result.
pub struct ForceFieldTypifier<'o, 'r, 'a> {
    options: &'o ForcefieldOptions,
    reporter: &'r DiagnosticReporter<'a>,
}

impl<'o, 'r, 'a> ForceFieldTypifier<'o, 'r, 'a> {
    pub fn new(options: &'o ForcefieldOptions, reporter: &'r DiagnosticReporter<'a>) -> Self {
        Self { options, reporter }
    }

    /// Types `graph` and builds the snapshot, force terms and reference values.
    ///
    /// Works on a copy: on error nothing observable has changed.
    #[instrument(skip_all, name = "typify")]
    pub fn run(
        &self,
        graph: &MolecularGraph,
        n_molecules: usize,
        applicator: &impl ForcefieldApplicator,
    ) -> Result<AppliedForcefield, TypifyError> {
        let use_residue_map = self.options.residue_map.resolve(n_molecules);
        info!(use_residue_map, "Applying force field.");
        let mut typed = applicator.apply(graph, use_residue_map)?;

        if self.options.remove_hydrogens {
            let removed = self.remove_hydrogens(&mut typed)?;
            info!(removed, "Removed hydrogen atoms.");
        }

        if self.options.remove_charges {
            for (_, atom) in typed.atoms_mut() {
                atom.charge = 0.0;
            }
            if self.options.make_charge_neutral {
                self.reporter.report(Diagnostic::NeutralizationSkipped);
            }
        } else if self.options.make_charge_neutral {
            let neutral = charges::neutralize(&typed.charges());
            for ((_, atom), charge) in typed.atoms_mut().zip(neutral) {
                atom.charge = charge;
            }
            debug!(net_charge = typed.net_charge(), "Neutralized charges.");
        }

        let export::TypedExport {
            snapshot,
            forcefield,
            reference_values,
        } = export::export_typed(&typed, self.options.r_cut, self.options.scale_parameters);
        info!(
            particles = snapshot.n_particles,
            force_terms = forcefield.len(),
            "Built typed snapshot."
        );

        Ok(AppliedForcefield {
            typed_system: typed,
            snapshot,
            forcefield,
            reference_values,
        })
    }

    /// Folds every hydrogen into its first heavy-atom partner, then strips the hydrogens.
    fn remove_hydrogens(&self, typed: &mut TypedTopology) -> Result<usize, TypifyError> {
        let mut hydrogens: Vec<AtomId> = typed
            .atoms()
            .filter(|(_, a)| a.is_hydrogen())
            .map(|(id, _)| id)
            .collect();

        if hydrogens.is_empty() {
            hydrogens = typed
                .atoms()
                .filter(|(_, a)| (a.mass - HYDROGEN_MASS_AMU).abs() < HYDROGEN_MASS_TOLERANCE)
                .map(|(id, _)| id)
                .collect();
            for &id in &hydrogens {
                if let Some(atom) = typed.atom_mut(id) {
                    atom.atomic_number = 1;
                }
            }
            if !hydrogens.is_empty() {
                debug!(count = hydrogens.len(), "Identified hydrogens by mass.");
            }
        }

        if hydrogens.is_empty() {
            self.reporter.report(Diagnostic::HydrogenNotFound);
            return Ok(0);
        }

        for &h in &hydrogens {
            let graph = typed.graph();
            let Some(hydrogen) = graph.atom(h) else {
                continue;
            };
            let (mass, charge) = (hydrogen.mass, hydrogen.charge);
            let partner = typed
                .bond_partners(h)
                .iter()
                .copied()
                .find(|&p| graph.atom(p).is_some_and(|a| !a.is_hydrogen()))
                .ok_or_else(|| TypifyError::OrphanHydrogen {
                    atom_name: hydrogen.name.clone(),
                })?;
            if let Some(heavy) = typed.atom_mut(partner) {
                heavy.mass += mass;
                heavy.charge += charge;
            }
        }

        Ok(typed.strip(|a| a.is_hydrogen()))
    }
}
