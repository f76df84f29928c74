use super::typed::LjParams;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Wildcard accepted in bonded parameter type lists.
pub const WILDCARD: &str = "*";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CombiningRule {
    /// `sigma_ij = sqrt(sigma_i * sigma_j)`, `epsilon_ij = sqrt(epsilon_i * epsilon_j)`.
    #[default]
    Geometric,
    /// Lorentz-Berthelot: arithmetic sigma, geometric epsilon.
    Lorentz,
}

impl CombiningRule {
    pub fn mix(&self, a: &LjParams, b: &LjParams) -> LjParams {
        let epsilon = (a.epsilon * b.epsilon).sqrt();
        let sigma = match self {
            CombiningRule::Geometric => (a.sigma * b.sigma).sqrt(),
            CombiningRule::Lorentz => 0.5 * (a.sigma + b.sigma),
        };
        LjParams { sigma, epsilon }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalParams {
    #[serde(default)]
    pub combining_rule: CombiningRule,
    #[serde(default = "default_scale_14")]
    pub lj14_scale: f64,
    #[serde(default = "default_scale_14")]
    pub coulomb14_scale: f64,
}

fn default_scale_14() -> f64 {
    0.5
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            combining_rule: CombiningRule::default(),
            lj14_scale: default_scale_14(),
            coulomb14_scale: default_scale_14(),
        }
    }
}

/// A typing rule. The first rule (in file order) matching an atom assigns its type.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AtomTypeRule {
    pub name: String,
    /// Element symbol the atom must have.
    pub element: Option<String>,
    /// Atom name the atom must have (used for element-less beads).
    pub particle: Option<String>,
    /// Exact number of bonded neighbors.
    pub neighbors: Option<usize>,
    /// Residue (template) name the atom must belong to.
    pub residue: Option<String>,
    pub charge: Option<f64>,
    pub mass: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BondParam {
    pub types: [String; 2],
    /// Force constant in kcal/mol/Å².
    pub k: f64,
    /// Equilibrium length in Å.
    pub r0: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AngleParam {
    pub types: [String; 3],
    /// Force constant in kcal/mol/rad².
    pub k: f64,
    /// Equilibrium angle in degrees.
    pub theta0: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DihedralParam {
    pub types: [String; 4],
    /// Barrier height in kcal/mol.
    pub k: f64,
    pub n: u32,
    /// Phase in degrees.
    #[serde(default)]
    pub phi0: f64,
    /// Sign factor of the periodic term.
    #[serde(default = "default_dihedral_sign")]
    pub d: f64,
}

fn default_dihedral_sign() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NonBondedParam {
    #[serde(rename = "type")]
    pub atom_type: String,
    /// Lennard-Jones sigma in Å.
    pub sigma: f64,
    /// Lennard-Jones epsilon in kcal/mol.
    pub epsilon: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ForcefieldDefinition {
    #[serde(default)]
    globals: GlobalParams,
    atom_types: Vec<AtomTypeRule>,
    #[serde(default)]
    bonds: Vec<BondParam>,
    #[serde(default)]
    angles: Vec<AngleParam>,
    #[serde(default)]
    dihedrals: Vec<DihedralParam>,
}

/// A rule-based force field: typing rules, per-type Lennard-Jones parameters and bonded terms.
#[derive(Debug, Clone)]
pub struct Forcefield {
    pub globals: GlobalParams,
    pub atom_types: Vec<AtomTypeRule>,
    pub non_bonded: HashMap<String, NonBondedParam>,
    pub bonds: Vec<BondParam>,
    pub angles: Vec<AngleParam>,
    pub dihedrals: Vec<DihedralParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid force field definition: {0}")]
    Invalid(String),
}

const INLINE_SOURCE: &str = "<inline>";

impl Forcefield {
    /// Loads a force field from a TOML definition and a `type,sigma,epsilon` CSV table.
    pub fn load(definition_path: &Path, non_bonded_path: &Path) -> Result<Self, ParamLoadError> {
        let path_str = definition_path.to_string_lossy().to_string();
        let content =
            std::fs::read_to_string(definition_path).map_err(|e| ParamLoadError::Io {
                path: path_str.clone(),
                source: e,
            })?;
        let definition = Self::parse_definition(&content, &path_str)?;

        let reader = csv::Reader::from_path(non_bonded_path).map_err(|e| ParamLoadError::Csv {
            path: non_bonded_path.to_string_lossy().to_string(),
            source: e,
        })?;
        let non_bonded = Self::read_non_bonded(reader, &non_bonded_path.to_string_lossy())?;

        Self::assemble(definition, non_bonded)
    }

    /// Parses a force field from in-memory TOML and CSV text.
    pub fn parse(definition: &str, non_bonded_csv: &str) -> Result<Self, ParamLoadError> {
        let definition = Self::parse_definition(definition, INLINE_SOURCE)?;
        let reader = csv::Reader::from_reader(non_bonded_csv.as_bytes());
        let non_bonded = Self::read_non_bonded(reader, INLINE_SOURCE)?;
        Self::assemble(definition, non_bonded)
    }

    fn parse_definition(content: &str, path: &str) -> Result<ForcefieldDefinition, ParamLoadError> {
        toml::from_str(content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string(),
            source: e,
        })
    }

    fn read_non_bonded<R: std::io::Read>(
        mut reader: csv::Reader<R>,
        path: &str,
    ) -> Result<HashMap<String, NonBondedParam>, ParamLoadError> {
        let mut non_bonded = HashMap::new();
        for result in reader.deserialize::<NonBondedParam>() {
            let record = result.map_err(|e| ParamLoadError::Csv {
                path: path.to_string(),
                source: e,
            })?;
            non_bonded.insert(record.atom_type.clone(), record);
        }
        Ok(non_bonded)
    }

    fn assemble(
        definition: ForcefieldDefinition,
        non_bonded: HashMap<String, NonBondedParam>,
    ) -> Result<Self, ParamLoadError> {
        for rule in &definition.atom_types {
            if rule.element.is_none() && rule.particle.is_none() {
                return Err(ParamLoadError::Invalid(format!(
                    "atom type '{}' must set `element` or `particle`",
                    rule.name
                )));
            }
            if let Some(symbol) = &rule.element {
                if crate::core::models::element::lookup(symbol).is_none() {
                    return Err(ParamLoadError::Invalid(format!(
                        "atom type '{}' references unknown element '{}'",
                        rule.name, symbol
                    )));
                }
            }
        }

        Ok(Self {
            globals: definition.globals,
            atom_types: definition.atom_types,
            non_bonded,
            bonds: definition.bonds,
            angles: definition.angles,
            dihedrals: definition.dihedrals,
        })
    }

    pub fn bond_param(&self, types: [&str; 2]) -> Option<&BondParam> {
        find_bonded(&self.bonds, |p| p.types.as_slice(), &types)
    }

    pub fn angle_param(&self, types: [&str; 3]) -> Option<&AngleParam> {
        find_bonded(&self.angles, |p| p.types.as_slice(), &types)
    }

    pub fn dihedral_param(&self, types: [&str; 4]) -> Option<&DihedralParam> {
        find_bonded(&self.dihedrals, |p| p.types.as_slice(), &types)
    }
}

/// Finds a bonded entry matching `types` forward or reversed; exact matches win over wildcards.
fn find_bonded<'a, T>(
    entries: &'a [T],
    key: impl Fn(&T) -> &[String],
    types: &[&str],
) -> Option<&'a T> {
    let fits_pattern = |pattern: &[String], allow_wildcard: bool| {
        let fits = |p: &String, t: &&str| p == t || (allow_wildcard && p == WILDCARD);
        pattern.iter().zip(types.iter()).all(|(p, t)| fits(p, t))
            || pattern.iter().rev().zip(types.iter()).all(|(p, t)| fits(p, t))
    };
    entries
        .iter()
        .find(|e| fits_pattern(key(e), false))
        .or_else(|| entries.iter().find(|e| fits_pattern(key(e), true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DEFINITION: &str = r#"
        [globals]
        combining-rule = "lorentz"
        lj14-scale = 0.0

        [[atom-types]]
        name = "CT"
        element = "C"
        neighbors = 4

        [[atom-types]]
        name = "HC"
        element = "H"
        charge = 0.06

        [[bonds]]
        types = ["CT", "HC"]
        k = 340.0
        r0 = 1.09

        [[angles]]
        types = ["HC", "CT", "HC"]
        k = 33.0
        theta0 = 107.8

        [[dihedrals]]
        types = ["*", "CT", "CT", "*"]
        k = 0.3
        n = 3

        [[dihedrals]]
        types = ["HC", "CT", "CT", "HC"]
        k = 0.15
        n = 3
        phi0 = 0.0
    "#;

    const NON_BONDED: &str = "type,sigma,epsilon\nCT,3.5,0.066\nHC,2.5,0.03\n";

    #[test]
    fn parse_reads_all_sections() {
        let ff = Forcefield::parse(DEFINITION, NON_BONDED).unwrap();
        assert_eq!(ff.globals.combining_rule, CombiningRule::Lorentz);
        assert_eq!(ff.globals.lj14_scale, 0.0);
        assert_eq!(ff.globals.coulomb14_scale, 0.5);
        assert_eq!(ff.atom_types.len(), 2);
        assert_eq!(ff.atom_types[1].charge, Some(0.06));
        assert_eq!(ff.non_bonded["CT"].sigma, 3.5);
        assert_eq!(ff.dihedrals[0].d, 1.0);
    }

    #[test]
    fn bonded_lookup_accepts_reversed_order() {
        let ff = Forcefield::parse(DEFINITION, NON_BONDED).unwrap();
        assert_eq!(ff.bond_param(["HC", "CT"]).unwrap().r0, 1.09);
        assert_eq!(ff.bond_param(["CT", "HC"]).unwrap().r0, 1.09);
        assert!(ff.bond_param(["CT", "CT"]).is_none());
    }

    #[test]
    fn bonded_lookup_prefers_exact_over_wildcard() {
        let ff = Forcefield::parse(DEFINITION, NON_BONDED).unwrap();
        assert_eq!(ff.dihedral_param(["HC", "CT", "CT", "HC"]).unwrap().k, 0.15);
        assert_eq!(ff.dihedral_param(["CT", "CT", "CT", "HC"]).unwrap().k, 0.3);
    }

    #[test]
    fn combining_rules_mix_as_documented() {
        let a = LjParams {
            sigma: 1.0,
            epsilon: 4.0,
        };
        let b = LjParams {
            sigma: 4.0,
            epsilon: 1.0,
        };
        let geometric = CombiningRule::Geometric.mix(&a, &b);
        assert_eq!((geometric.sigma, geometric.epsilon), (2.0, 2.0));
        let lorentz = CombiningRule::Lorentz.mix(&a, &b);
        assert_eq!((lorentz.sigma, lorentz.epsilon), (2.5, 2.0));
    }

    #[test]
    fn parse_rejects_rule_without_selector() {
        let def = "[[atom-types]]\nname = \"X\"\n";
        let result = Forcefield::parse(def, NON_BONDED);
        assert!(matches!(result, Err(ParamLoadError::Invalid(_))));
    }

    #[test]
    fn parse_rejects_unknown_element() {
        let def = "[[atom-types]]\nname = \"X\"\nelement = \"Qq\"\n";
        let result = Forcefield::parse(def, NON_BONDED);
        assert!(matches!(result, Err(ParamLoadError::Invalid(_))));
    }

    #[test]
    fn parse_fails_for_malformed_inputs() {
        assert!(matches!(
            Forcefield::parse("not toml", NON_BONDED),
            Err(ParamLoadError::Toml { .. })
        ));
        assert!(matches!(
            Forcefield::parse(DEFINITION, "type,sigma,epsilon\nCT,abc,0.1\n"),
            Err(ParamLoadError::Csv { .. })
        ));
    }

    #[test]
    fn load_reads_files_from_disk() {
        let dir = tempdir().unwrap();
        let def_path = dir.path().join("ff.toml");
        let nb_path = dir.path().join("nb.csv");
        fs::write(&def_path, DEFINITION).unwrap();
        fs::write(&nb_path, NON_BONDED).unwrap();

        let ff = Forcefield::load(&def_path, &nb_path).unwrap();
        assert_eq!(ff.non_bonded.len(), 2);
        assert_eq!(ff.angles[0].theta0, 107.8);
    }

    #[test]
    fn load_fails_for_missing_files() {
        let dir = tempdir().unwrap();
        let def_path = dir.path().join("ff.toml");
        let nb_path = dir.path().join("missing.csv");

        let result = Forcefield::load(&def_path, &nb_path);
        assert!(matches!(result, Err(ParamLoadError::Io { .. })));

        fs::write(&def_path, DEFINITION).unwrap();
        let result = Forcefield::load(&def_path, &nb_path);
        assert!(matches!(result, Err(ParamLoadError::Csv { .. })));
    }
}
