// ---------------------------------------------------------------------------
// Periodic table subset used by the SMILES parser
// ---------------------------------------------------------------------------

/// A chemical element as far as featurization cares about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub atomic_number: u8,
    /// Standard atomic weight in g/mol.
    pub mass: f64,
}

/// `*` in SMILES: an unknown atom.
pub const WILDCARD: Element = Element {
    symbol: "*",
    atomic_number: 0,
    mass: 0.0,
};

pub const HYDROGEN_MASS: f64 = 1.008;

const fn el(symbol: &'static str, atomic_number: u8, mass: f64) -> Element {
    Element {
        symbol,
        atomic_number,
        mass,
    }
}

static TABLE: &[Element] = &[
    el("H", 1, 1.008),
    el("He", 2, 4.003),
    el("Li", 3, 6.94),
    el("Be", 4, 9.012),
    el("B", 5, 10.81),
    el("C", 6, 12.011),
    el("N", 7, 14.007),
    el("O", 8, 15.999),
    el("F", 9, 18.998),
    el("Ne", 10, 20.180),
    el("Na", 11, 22.990),
    el("Mg", 12, 24.305),
    el("Al", 13, 26.982),
    el("Si", 14, 28.085),
    el("P", 15, 30.974),
    el("S", 16, 32.06),
    el("Cl", 17, 35.45),
    el("Ar", 18, 39.948),
    el("K", 19, 39.098),
    el("Ca", 20, 40.078),
    el("Sc", 21, 44.956),
    el("Ti", 22, 47.867),
    el("V", 23, 50.942),
    el("Cr", 24, 51.996),
    el("Mn", 25, 54.938),
    el("Fe", 26, 55.845),
    el("Co", 27, 58.933),
    el("Ni", 28, 58.693),
    el("Cu", 29, 63.546),
    el("Zn", 30, 65.38),
    el("Ga", 31, 69.723),
    el("Ge", 32, 72.630),
    el("As", 33, 74.922),
    el("Se", 34, 78.971),
    el("Br", 35, 79.904),
    el("Kr", 36, 83.798),
    el("Rb", 37, 85.468),
    el("Sr", 38, 87.62),
    el("Y", 39, 88.906),
    el("Zr", 40, 91.224),
    el("Nb", 41, 92.906),
    el("Mo", 42, 95.95),
    el("Tc", 43, 98.0),
    el("Ru", 44, 101.07),
    el("Rh", 45, 102.91),
    el("Pd", 46, 106.42),
    el("Ag", 47, 107.87),
    el("Cd", 48, 112.41),
    el("In", 49, 114.82),
    el("Sn", 50, 118.71),
    el("Sb", 51, 121.76),
    el("Te", 52, 127.60),
    el("I", 53, 126.90),
    el("Xe", 54, 131.29),
    el("Cs", 55, 132.91),
    el("Ba", 56, 137.33),
    el("La", 57, 138.91),
    el("Ce", 58, 140.12),
    el("Pr", 59, 140.91),
    el("Nd", 60, 144.24),
    el("Pm", 61, 145.0),
    el("Sm", 62, 150.36),
    el("Eu", 63, 151.96),
    el("Gd", 64, 157.25),
    el("Tb", 65, 158.93),
    el("Dy", 66, 162.50),
    el("Ho", 67, 164.93),
    el("Er", 68, 167.26),
    el("Tm", 69, 168.93),
    el("Yb", 70, 173.05),
    el("Lu", 71, 174.97),
    el("Hf", 72, 178.49),
    el("Ta", 73, 180.95),
    el("W", 74, 183.84),
    el("Re", 75, 186.21),
    el("Os", 76, 190.23),
    el("Ir", 77, 192.22),
    el("Pt", 78, 195.08),
    el("Au", 79, 196.97),
    el("Hg", 80, 200.59),
    el("Tl", 81, 204.38),
    el("Pb", 82, 207.2),
    el("Bi", 83, 208.98),
    el("Po", 84, 209.0),
    el("At", 85, 210.0),
    el("Rn", 86, 222.0),
];

/// Look up an element by its (case-sensitive) symbol.
pub fn by_symbol(symbol: &str) -> Option<Element> {
    TABLE.iter().copied().find(|e| e.symbol == symbol)
}

/// Default valences, lowest first: the SMILES organic subset plus the
/// heavier aromatic-capable analogues (As, Se, Te).
/// `None` for elements with no fixed valence.
pub fn default_valences(atomic_number: u8) -> Option<&'static [u8]> {
    match atomic_number {
        5 => Some(&[3]),
        6 => Some(&[4]),
        7 | 15 | 33 => Some(&[3, 5]),
        8 => Some(&[2]),
        16 | 34 | 52 => Some(&[2, 4, 6]),
        9 | 17 | 35 | 53 => Some(&[1]),
        _ => None,
    }
}

/// Valences permitted for a charged atom: those of the isoelectronic
/// neutral element, so `[N+]` takes four bonds and `[O-]` one.
pub fn allowed_valences(atomic_number: u8, charge: i8) -> Option<&'static [u8]> {
    let shifted = i16::from(atomic_number) - i16::from(charge);
    u8::try_from(shifted).ok().and_then(default_valences)
}

pub fn is_halogen(atomic_number: u8) -> bool {
    matches!(atomic_number, 9 | 17 | 35 | 53)
}
