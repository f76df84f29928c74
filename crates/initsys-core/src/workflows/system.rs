use crate::core::forcefield::typed::TypedTopology;
use crate::core::forcefield::typing::ForcefieldApplicator;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::molecule::Molecule;
use crate::core::models::structure::{SimBox, Structure};
use crate::core::units::ReferenceValues;
use crate::engine::aggregate::{MoleculeInput, aggregate};
use crate::engine::assembly::{Assembler, AssemblyError};
use crate::engine::box_sizer;
use crate::engine::config::{BoxConstraints, ConfigError, ForcefieldOptions, SystemConfig};
use crate::engine::convert::TopologyConverter;
use crate::engine::diagnostics::DiagnosticReporter;
use crate::engine::error::SystemError;
use crate::engine::export::{self, ForceTerm, Snapshot};
use crate::engine::state::ForcefieldState;
use crate::engine::typify::ForceFieldTypifier;
use std::sync::Arc;
use tracing::{info, instrument};

/// A molecular system under construction.
///
/// Construction aggregates the molecule input, assembles it with the injected
/// [`Assembler`] and converts the result into a bonded topology. A force field can
/// then be applied any number of times; each successful application replaces the
/// previous typed state as a whole.
#[derive(Debug, Clone)]
pub struct System {
    molecules: Vec<Arc<Molecule>>,
    structure: Structure,
    topology: MolecularGraph,
    config: SystemConfig,
    untyped_snapshot: Snapshot,
    untyped_reference_values: ReferenceValues,
    target_box: Option<[f64; 3]>,
    forcefield_state: ForcefieldState,
}

impl System {
    #[instrument(skip_all, name = "system_setup")]
    pub fn new(
        input: impl Into<MoleculeInput>,
        assembler: &impl Assembler,
        config: SystemConfig,
    ) -> Result<Self, SystemError> {
        let aggregated = aggregate(input.into())?;
        info!(
            molecules = aggregated.n_molecules(),
            particles = aggregated.n_particles(),
            mass = aggregated.mass(),
            "Aggregated molecule input."
        );

        let structure = assembler.assemble(aggregated.molecules())?;
        if structure.molecules().len() != aggregated.n_molecules() {
            return Err(AssemblyError::Failed(format!(
                "assembler placed {} molecules, expected {}",
                structure.molecules().len(),
                aggregated.n_molecules()
            ))
            .into());
        }

        let topology = TopologyConverter::default().convert(&structure);
        let untyped_reference_values = untyped_reference_values(&topology, &config);
        let untyped_snapshot = export::export_untyped(&topology, &untyped_reference_values);
        info!(
            atoms = topology.n_atoms(),
            bonds = topology.bonds().len(),
            box_nm = ?structure.sim_box().lengths(),
            "System assembled."
        );

        Ok(Self {
            molecules: aggregated.molecules().to_vec(),
            structure,
            topology,
            config,
            untyped_snapshot,
            untyped_reference_values,
            target_box: None,
            forcefield_state: ForcefieldState::Unapplied,
        })
    }

    /// Types the topology and builds the snapshot, force terms and reference values.
    ///
    /// On failure the previously applied state, if any, is left untouched.
    #[instrument(skip_all, name = "apply_forcefield")]
    pub fn apply_forcefield(
        &mut self,
        forcefield: &impl ForcefieldApplicator,
        options: &ForcefieldOptions,
        reporter: &DiagnosticReporter,
    ) -> Result<(), SystemError> {
        if !(options.r_cut.is_finite() && options.r_cut > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "r_cut",
                reason: format!("must be a positive number, got {}", options.r_cut),
            }
            .into());
        }
        let applied = ForceFieldTypifier::new(options, reporter).run(
            &self.topology,
            self.n_molecules(),
            forcefield,
        )?;
        info!(
            reference_distance = applied.reference_values.distance,
            reference_energy = applied.reference_values.energy,
            reference_mass = applied.reference_values.mass,
            "Force field applied."
        );
        self.forcefield_state = ForcefieldState::Applied(Box::new(applied));
        Ok(())
    }

    /// Solves box edges (nm) reproducing the system mass at the configured density.
    ///
    /// Edges given in `constraints` are kept; every call overwrites the previous target.
    pub fn set_target_box(&mut self, constraints: BoxConstraints) -> Result<[f64; 3], SystemError> {
        let lengths =
            box_sizer::calculate_edge_lengths(self.mass(), self.config.density, &constraints)?;
        info!(target_box = ?lengths, "Target box set.");
        self.target_box = Some(lengths);
        Ok(lengths)
    }

    pub fn n_molecules(&self) -> usize {
        self.molecules.len()
    }

    pub fn n_particles(&self) -> usize {
        self.structure.n_particles()
    }

    /// Total mass in amu, read from the assembled structure.
    pub fn mass(&self) -> f64 {
        self.structure.mass()
    }

    /// The box of the assembled structure.
    pub fn sim_box(&self) -> &SimBox {
        self.structure.sim_box()
    }

    pub fn molecules(&self) -> &[Arc<Molecule>] {
        &self.molecules
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn topology(&self) -> &MolecularGraph {
        &self.topology
    }

    pub fn target_box(&self) -> Option<[f64; 3]> {
        self.target_box
    }

    pub fn density(&self) -> f64 {
        self.config.density
    }

    pub fn r_cut(&self) -> f64 {
        self.config.r_cut
    }

    pub fn auto_scale(&self) -> bool {
        self.config.auto_scale
    }

    pub fn base_units(&self) -> Option<&ReferenceValues> {
        self.config.base_units.as_ref()
    }

    pub fn untyped_snapshot(&self) -> &Snapshot {
        &self.untyped_snapshot
    }

    pub fn untyped_reference_values(&self) -> &ReferenceValues {
        &self.untyped_reference_values
    }

    pub fn forcefield_state(&self) -> &ForcefieldState {
        &self.forcefield_state
    }

    pub fn snapshot(&self) -> Result<&Snapshot, SystemError> {
        Ok(&self.forcefield_state.applied()?.snapshot)
    }

    pub fn forcefield(&self) -> Result<&[ForceTerm], SystemError> {
        Ok(self.forcefield_state.applied()?.forcefield.as_slice())
    }

    pub fn typed_system(&self) -> Result<&TypedTopology, SystemError> {
        Ok(&self.forcefield_state.applied()?.typed_system)
    }

    pub fn reference_values(&self) -> Result<&ReferenceValues, SystemError> {
        Ok(&self.forcefield_state.applied()?.reference_values)
    }

    /// Reference distance in Å.
    pub fn reference_distance(&self) -> Result<f64, SystemError> {
        Ok(self.reference_values()?.distance)
    }

    /// Reference mass in amu.
    pub fn reference_mass(&self) -> Result<f64, SystemError> {
        Ok(self.reference_values()?.mass)
    }

    /// Reference energy in kcal/mol.
    pub fn reference_energy(&self) -> Result<f64, SystemError> {
        Ok(self.reference_values()?.energy)
    }
}

/// Reference values for the untyped snapshot.
fn untyped_reference_values(
    topology: &MolecularGraph,
    config: &SystemConfig,
) -> ReferenceValues {
    if let Some(base_units) = config.base_units {
        return base_units;
    }
    if config.auto_scale {
        let mass = topology
            .atoms_iter()
            .map(|(_, a)| a.mass)
            .fold(f64::NEG_INFINITY, f64::max);
        let mass = if mass.is_finite() && mass > 0.0 { mass } else { 1.0 };
        return ReferenceValues {
            mass,
            ..Default::default()
        };
    }
    ReferenceValues::default()
}
