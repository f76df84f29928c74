use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use initsys::core::units::ReferenceValues;
use initsys::engine::config::{
    self as core_config, BoxConstraints, ForcefieldOptions, ResidueMapPolicy, SystemConfig,
    SystemConfigBuilder,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_LATTICE_SPACING: f64 = 1.0;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum PartialResidueMap {
    Auto,
    Always,
    Never,
}

impl From<PartialResidueMap> for ResidueMapPolicy {
    fn from(p: PartialResidueMap) -> Self {
        match p {
            PartialResidueMap::Auto => ResidueMapPolicy::Auto,
            PartialResidueMap::Always => ResidueMapPolicy::Always,
            PartialResidueMap::Never => ResidueMapPolicy::Never,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct PartialMoleculeEntry {
    template: PathBuf,
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    1
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialForcefieldConfig {
    definition: Option<PathBuf>,
    non_bonded: Option<PathBuf>,
    remove_hydrogens: Option<bool>,
    scale_parameters: Option<bool>,
    remove_charges: Option<bool>,
    make_charge_neutral: Option<bool>,
    r_cut: Option<f64>,
    residue_map: Option<PartialResidueMap>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
struct PartialTargetBox {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
}

/// A build recipe as read from TOML; every field may still be overridden from the CLI.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialBuildConfig {
    density: Option<f64>,
    r_cut: Option<f64>,
    auto_scale: Option<bool>,
    base_units: Option<ReferenceValues>,
    lattice_spacing: Option<f64>,
    #[serde(default)]
    molecules: Vec<PartialMoleculeEntry>,
    forcefield: Option<PartialForcefieldConfig>,
    target_box: Option<PartialTargetBox>,
}

/// Where to find a force field and how to apply it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForcefieldSetup {
    pub definition: PathBuf,
    pub non_bonded: PathBuf,
    pub options: ForcefieldOptions,
}

/// The fully merged configuration of a `build` run.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Template paths and replica counts, in input order.
    pub molecules: Vec<(PathBuf, usize)>,
    pub system: SystemConfig,
    pub lattice_spacing: f64,
    pub forcefield: Option<ForcefieldSetup>,
    pub target_box: BoxConstraints,
    pub output: PathBuf,
}

impl PartialBuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }
        debug!("Loaded recipe from {:?}: {:?}", path, config);
        Ok(config)
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for entry in &mut self.molecules {
            resolve(&mut entry.template);
        }
        if let Some(ff) = &mut self.forcefield {
            for path in [&mut ff.definition, &mut ff.non_bonded].into_iter().flatten() {
                resolve(path);
            }
        }
    }

    pub fn merge_with_cli(self, args: &BuildArgs) -> Result<BuildConfig> {
        if self.molecules.is_empty() {
            return Err(CliError::Config(
                "the recipe must list at least one [[molecules]] entry".to_string(),
            ));
        }
        let molecules = self
            .molecules
            .iter()
            .map(|m| (m.template.clone(), m.count))
            .collect();

        let density = args
            .density
            .or(self.density)
            .ok_or_else(|| CliError::Config("a density is required".to_string()))?;
        let r_cut = args
            .r_cut
            .or(self.r_cut)
            .unwrap_or(core_config::DEFAULT_R_CUT);

        let mut builder = SystemConfigBuilder::new()
            .density(density)
            .r_cut(r_cut)
            .auto_scale(self.auto_scale.unwrap_or(false));
        if let Some(units) = self.base_units {
            builder = builder.base_units(units);
        }
        let system = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let forcefield = merge_forcefield(self.forcefield.unwrap_or_default(), args, &system)?;

        let file_box = self.target_box.unwrap_or_default();
        let target_box = BoxConstraints {
            x: args.target_x.or(file_box.x),
            y: args.target_y.or(file_box.y),
            z: args.target_z.or(file_box.z),
        };

        Ok(BuildConfig {
            molecules,
            system,
            lattice_spacing: args
                .spacing
                .or(self.lattice_spacing)
                .unwrap_or(DEFAULT_LATTICE_SPACING),
            forcefield,
            target_box,
            output: args.output.clone(),
        })
    }
}

fn merge_forcefield(
    file: PartialForcefieldConfig,
    args: &BuildArgs,
    system: &SystemConfig,
) -> Result<Option<ForcefieldSetup>> {
    let definition = args.forcefield.clone().or(file.definition);
    let non_bonded = args.nonbonded.clone().or(file.non_bonded);
    let (definition, non_bonded) = match (definition, non_bonded) {
        (Some(d), Some(n)) => (d, n),
        (None, None) => return Ok(None),
        _ => {
            return Err(CliError::Config(
                "a force field needs both a definition and a non-bonded table".to_string(),
            ));
        }
    };

    let defaults = system.forcefield_options();
    let options = ForcefieldOptions {
        remove_hydrogens: args.remove_hydrogens
            || file.remove_hydrogens.unwrap_or(defaults.remove_hydrogens),
        scale_parameters: !args.no_scale
            && file.scale_parameters.unwrap_or(defaults.scale_parameters),
        remove_charges: args.remove_charges
            || file.remove_charges.unwrap_or(defaults.remove_charges),
        make_charge_neutral: args.charge_neutral
            || file.make_charge_neutral.unwrap_or(defaults.make_charge_neutral),
        r_cut: file.r_cut.unwrap_or(defaults.r_cut),
        residue_map: args
            .residue_map
            .map(Into::into)
            .or(file.residue_map.map(Into::into))
            .unwrap_or(defaults.residue_map),
    };

    Ok(Some(ForcefieldSetup {
        definition,
        non_bonded,
        options,
    }))
}
