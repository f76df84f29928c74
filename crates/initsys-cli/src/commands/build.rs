use crate::cli::BuildArgs;
use crate::config::{BuildConfig, PartialBuildConfig};
use crate::error::Result;
use initsys::core::forcefield::params::Forcefield;
use initsys::core::models::molecule::{Molecule, MoleculeSet};
use initsys::core::units::ReferenceValues;
use initsys::engine::aggregate::MoleculeInput;
use initsys::engine::assembly::LatticeAssembler;
use initsys::engine::diagnostics::{Diagnostic, DiagnosticReporter};
use initsys::engine::export::{ForceTerm, Snapshot};
use initsys::workflows::system::System;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Serialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct BuildOutput<'a> {
    n_molecules: usize,
    n_particles: usize,
    mass: f64,
    density: f64,
    target_box: [f64; 3],
    typed: bool,
    diagnostics: Vec<String>,
    reference_values: &'a ReferenceValues,
    snapshot: &'a Snapshot,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    forcefield: &'a [ForceTerm],
}

pub fn run(args: BuildArgs) -> Result<()> {
    let partial_config = PartialBuildConfig::from_file(&args.recipe)?;
    info!("Merging configuration from recipe and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let rendered = build(&config)?;
    info!("Writing system to {:?}", &config.output);
    std::fs::write(&config.output, rendered)?;
    println!("System written to {}", config.output.display());
    Ok(())
}

/// Runs the full pipeline for `config` and renders the result as TOML.
pub fn build(config: &BuildConfig) -> Result<String> {
    let mut sets = Vec::with_capacity(config.molecules.len());
    for (path, count) in &config.molecules {
        info!("Loading template {:?} (x{})", path, count);
        let template = Arc::new(Molecule::load(path)?);
        sets.push(MoleculeSet::replicate(template, *count));
    }

    let assembler = LatticeAssembler::new(config.lattice_spacing);
    let mut system = System::new(
        MoleculeInput::Nested(sets),
        &assembler,
        config.system.clone(),
    )?;
    let target_box = system.set_target_box(config.target_box)?;

    let diagnostics = Mutex::new(Vec::new());
    if let Some(setup) = &config.forcefield {
        info!("Loading force field from {:?}", &setup.definition);
        let forcefield = Forcefield::load(&setup.definition, &setup.non_bonded)?;
        let reporter = DiagnosticReporter::with_callback(Box::new(|d: &Diagnostic| {
            if let Ok(mut seen) = diagnostics.lock() {
                seen.push(d.to_string());
            }
        }));
        system.apply_forcefield(&forcefield, &setup.options, &reporter)?;
    }
    let diagnostics = diagnostics.into_inner().unwrap_or_default();

    let output = if system.forcefield_state().is_applied() {
        BuildOutput {
            n_molecules: system.n_molecules(),
            n_particles: system.n_particles(),
            mass: system.mass(),
            density: system.density(),
            target_box,
            typed: true,
            diagnostics,
            reference_values: system.reference_values()?,
            snapshot: system.snapshot()?,
            forcefield: system.forcefield()?,
        }
    } else {
        BuildOutput {
            n_molecules: system.n_molecules(),
            n_particles: system.n_particles(),
            mass: system.mass(),
            density: system.density(),
            target_box,
            typed: false,
            diagnostics,
            reference_values: system.untyped_reference_values(),
            snapshot: system.untyped_snapshot(),
            forcefield: &[],
        }
    };

    toml::to_string(&output).map_err(|e| anyhow::anyhow!("Failed to render output: {}", e).into())
}
