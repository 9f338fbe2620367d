use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid nuclide name: '{0}'")]
pub struct ParseNuclideError(String);

/// Element symbols indexed by atomic number minus one.
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// A chemical element, identified by its atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub const H: Element = Element(1);
    pub const HE: Element = Element(2);
    pub const C: Element = Element(6);
    pub const O: Element = Element(8);
    pub const FE: Element = Element(26);
    pub const NI: Element = Element(28);

    pub fn from_atomic_number(z: u32) -> Option<Self> {
        let z = u8::try_from(z).ok()?;
        (1..=SYMBOLS.len()).contains(&usize::from(z)).then_some(Self(z))
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[usize::from(self.0) - 1]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Symbols are case-sensitive: `Fe`, never `fe` or `FE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SYMBOLS
            .iter()
            .position(|&symbol| symbol == s)
            .and_then(|idx| u8::try_from(idx + 1).ok())
            .map(Self)
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

/// An isotope identified by its element and mass number, e.g. `Ni56`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nuclide {
    pub element: Element,
    pub mass_number: u32,
}

impl Nuclide {
    pub fn new(element: Element, mass_number: u32) -> Self {
        Self {
            element,
            mass_number,
        }
    }

    #[inline]
    pub fn atomic_number(&self) -> u32 {
        u32::from(self.element.atomic_number())
    }

    /// Lower-case network name as used by MESA (`he4`, `ni56`).
    pub fn network_name(&self) -> String {
        format!(
            "{}{}",
            self.element.symbol().to_lowercase(),
            self.mass_number
        )
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.element.symbol(), self.mass_number)
    }
}

impl FromStr for Nuclide {
    type Err = ParseNuclideError;

    /// Accepts both capitalized (`He4`) and MESA lower-case (`he4`) spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNuclideError(s.to_string());
        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(err)?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(err());
        }

        let mut symbol = letters[..1].to_uppercase();
        symbol.push_str(&letters[1..].to_lowercase());
        let element = Element::from_str(&symbol).map_err(|_| err())?;
        let mass_number = digits.parse::<u32>().map_err(|_| err())?;
        if mass_number < u32::from(element.atomic_number()) {
            return Err(err());
        }

        Ok(Self::new(element, mass_number))
    }
}

/// Whether `name` is a nuclide (`Ni56`) or a bare element symbol (`Fe`).
pub fn is_valid_nuclide_or_element(name: &str) -> bool {
    Nuclide::from_str(name).is_ok() || Element::from_str(name).is_ok()
}
