use crate::core::models::atom::Particle;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid molecule template '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    name: String,
    atoms: Vec<TemplateAtom>,
    #[serde(default)]
    bonds: Vec<TemplateBondEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateAtom {
    name: String,
    element: Option<String>,
    /// Position in nanometers.
    position: [f64; 3],
    #[serde(default)]
    charge: f64,
    mass: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateBondEntry {
    atoms: [usize; 2],
    #[serde(default)]
    order: BondOrder,
}

impl Molecule {
    /// Reads a molecule template from a TOML file.
    pub fn load(path: &Path) -> Result<Self, TemplateLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| TemplateLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        Self::parse_template(&content, &path_str)
    }

    /// Parses a molecule template from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, TemplateLoadError> {
        Self::parse_template(content, "<inline>")
    }

    fn parse_template(content: &str, path: &str) -> Result<Self, TemplateLoadError> {
        let file: TemplateFile = toml::from_str(content).map_err(|e| TemplateLoadError::Toml {
            path: path.to_string(),
            source: e,
        })?;
        let invalid = |reason: String| TemplateLoadError::Invalid {
            name: file.name.clone(),
            reason,
        };

        let mut molecule = Molecule::new(&file.name);
        for atom in &file.atoms {
            let [x, y, z] = atom.position;
            let position = Point3::new(x, y, z);
            let particle = match (&atom.element, atom.mass) {
                (Some(symbol), mass) => {
                    let mut particle = Particle::from_element(&atom.name, symbol, position)
                        .ok_or_else(|| {
                            invalid(format!(
                                "atom '{}' has unknown element '{}'",
                                atom.name, symbol
                            ))
                        })?;
                    if let Some(mass) = mass {
                        particle.mass = mass;
                    }
                    particle
                }
                (None, Some(mass)) => Particle::bead(&atom.name, mass, position),
                (None, None) => {
                    return Err(invalid(format!(
                        "atom '{}' needs an element or an explicit mass",
                        atom.name
                    )));
                }
            };
            if !(particle.mass.is_finite() && particle.mass > 0.0) {
                return Err(invalid(format!(
                    "atom '{}' has non-positive mass",
                    atom.name
                )));
            }
            molecule.add_particle(particle.with_charge(atom.charge));
        }

        for bond in &file.bonds {
            let [i, j] = bond.atoms;
            molecule
                .add_bond(i, j, bond.order)
                .ok_or_else(|| invalid(format!("bond {i}-{j} references invalid atoms")))?;
        }

        Ok(molecule)
    }
}
