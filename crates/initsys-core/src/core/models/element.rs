use phf::{Map, phf_map};

/// Static chemical data for one element.
///
/// Covalent radii are the Cordero et al. single-bond values in Angstroms and
/// are only used for distance-based bond perception.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInfo {
    pub symbol: &'static str,
    pub atomic_number: u8,
    /// Standard atomic weight in amu.
    pub mass: f64,
    /// Covalent radius in Angstroms.
    pub covalent_radius: f64,
    /// Upper bound on the number of bonds perceived for this element.
    pub max_valence: u8,
}

const fn element(
    symbol: &'static str,
    atomic_number: u8,
    mass: f64,
    covalent_radius: f64,
    max_valence: u8,
) -> ElementInfo {
    ElementInfo {
        symbol,
        atomic_number,
        mass,
        covalent_radius,
        max_valence,
    }
}

static ELEMENTS: Map<&'static str, ElementInfo> = phf_map! {
    "H" => element("H", 1, 1.008, 0.31, 1),
    "He" => element("He", 2, 4.0026, 0.28, 0),
    "Li" => element("Li", 3, 6.94, 1.28, 1),
    "B" => element("B", 5, 10.81, 0.84, 3),
    "C" => element("C", 6, 12.011, 0.76, 4),
    "N" => element("N", 7, 14.007, 0.71, 4),
    "O" => element("O", 8, 15.999, 0.66, 2),
    "F" => element("F", 9, 18.998, 0.57, 1),
    "Na" => element("Na", 11, 22.990, 1.66, 1),
    "Mg" => element("Mg", 12, 24.305, 1.41, 2),
    "Al" => element("Al", 13, 26.982, 1.21, 3),
    "Si" => element("Si", 14, 28.085, 1.11, 4),
    "P" => element("P", 15, 30.974, 1.07, 5),
    "S" => element("S", 16, 32.06, 1.05, 6),
    "Cl" => element("Cl", 17, 35.45, 1.02, 1),
    "K" => element("K", 19, 39.098, 2.03, 1),
    "Ca" => element("Ca", 20, 40.078, 1.76, 2),
    "Fe" => element("Fe", 26, 55.845, 1.32, 6),
    "Zn" => element("Zn", 30, 65.38, 1.22, 4),
    "Br" => element("Br", 35, 79.904, 1.20, 1),
    "I" => element("I", 53, 126.904, 1.39, 1),
};

/// Looks up an element by symbol, ignoring case (`"CL"`, `"cl"` and `"Cl"` all match).
pub fn lookup(symbol: &str) -> Option<&'static ElementInfo> {
    let symbol = symbol.trim();
    let mut chars = symbol.chars();
    let first = chars.next()?;
    let canonical: String = first
        .to_uppercase()
        .chain(chars.flat_map(|c| c.to_lowercase()))
        .collect();
    ELEMENTS.get(canonical.as_str())
}

pub fn by_atomic_number(atomic_number: u8) -> Option<&'static ElementInfo> {
    ELEMENTS
        .values()
        .find(|info| info.atomic_number == atomic_number)
}
