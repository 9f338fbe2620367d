use super::zone::TableError;
use indexmap::IndexMap;
use std::ops::Range;

/// Per-zone mass fractions keyed by isotope name, in nuclear-network order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    len: usize,
    fractions: IndexMap<String, Vec<f64>>,
}

impl Composition {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            fractions: IndexMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn species_count(&self) -> usize {
        self.fractions.len()
    }

    pub fn insert(&mut self, isotope: impl Into<String>, values: Vec<f64>) -> Result<(), TableError> {
        let isotope = isotope.into();
        if values.len() != self.len {
            return Err(TableError::ColumnLength {
                field: isotope,
                expected: self.len,
                found: values.len(),
            });
        }
        self.fractions.insert(isotope, values);
        Ok(())
    }

    pub fn get(&self, isotope: &str) -> Option<&[f64]> {
        self.fractions.get(isotope).map(Vec::as_slice)
    }

    pub fn contains(&self, isotope: &str) -> bool {
        self.fractions.contains_key(isotope)
    }

    pub fn isotopes(&self) -> impl Iterator<Item = &str> {
        self.fractions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.fractions
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Sum of all mass fractions in zone `zone`.
    pub fn zone_sum(&self, zone: usize) -> f64 {
        self.fractions.values().map(|values| values[zone]).sum()
    }

    /// Scales every zone so its mass fractions sum to one.
    ///
    /// Zones whose total is zero or not finite are left untouched.
    pub fn renormalize(&mut self) {
        for zone in 0..self.len {
            let total = self.zone_sum(zone);
            if total > 0.0 && total.is_finite() {
                for values in self.fractions.values_mut() {
                    values[zone] /= total;
                }
            }
        }
    }

    /// Per-zone sum over the members of `group` that are present.
    ///
    /// Returns `None` when no member of the group is tracked.
    pub fn lump(&self, group: &IsotopeGroup) -> Option<Vec<f64>> {
        let members: Vec<&[f64]> = group
            .members
            .iter()
            .filter_map(|name| self.get(name))
            .collect();
        if members.is_empty() {
            return None;
        }
        Some(
            (0..self.len)
                .map(|zone| members.iter().map(|values| values[zone]).sum())
                .collect(),
        )
    }

    pub(crate) fn reversed(&self) -> Self {
        Self {
            len: self.len,
            fractions: self
                .fractions
                .iter()
                .map(|(name, values)| (name.clone(), values.iter().rev().copied().collect()))
                .collect(),
        }
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> Self {
        Self {
            len: range.len(),
            fractions: self
                .fractions
                .iter()
                .map(|(name, values)| (name.clone(), values[range.clone()].to_vec()))
                .collect(),
        }
    }
}

/// A set of network isotopes reported to SNEC as one representative nuclide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsotopeGroup {
    pub mass_number: u32,
    pub atomic_number: u32,
    pub members: &'static [&'static str],
}

/// The thirteen alpha-chain groups understood by SNEC, from He-4 to Ni-56.
pub const ISOTOPE_GROUPS: [IsotopeGroup; 13] = [
    IsotopeGroup {
        mass_number: 4,
        atomic_number: 2,
        members: &["he3", "he4", "h2", "h3", "li6", "li7", "li8", "be7", "be9", "b8"],
    },
    IsotopeGroup {
        mass_number: 12,
        atomic_number: 6,
        members: &["c11", "c12", "c13", "c14", "n13", "n14", "n15", "b10", "b11"],
    },
    IsotopeGroup {
        mass_number: 16,
        atomic_number: 8,
        members: &["o15", "o16", "o17", "o18", "f17", "f18", "f19"],
    },
    IsotopeGroup {
        mass_number: 20,
        atomic_number: 10,
        members: &["ne20", "ne21", "ne22", "ne23", "na21", "na22", "na23", "na24"],
    },
    IsotopeGroup {
        mass_number: 24,
        atomic_number: 12,
        members: &["mg23", "mg24", "mg25", "mg26", "mg27", "al25", "al26", "al27", "al28"],
    },
    IsotopeGroup {
        mass_number: 28,
        atomic_number: 14,
        members: &[
            "si27", "si28", "si29", "si30", "si31", "si32", "p29", "p30", "p31", "p32", "p33",
            "p34",
        ],
    },
    IsotopeGroup {
        mass_number: 32,
        atomic_number: 16,
        members: &[
            "s31", "s32", "s33", "s34", "s35", "s36", "s37", "cl33", "cl34", "cl35", "cl36",
            "cl37", "cl38",
        ],
    },
    IsotopeGroup {
        mass_number: 36,
        atomic_number: 18,
        members: &[
            "ar36", "ar37", "ar38", "ar39", "ar40", "ar41", "k37", "k38", "k39", "k40", "k41",
            "k42",
        ],
    },
    IsotopeGroup {
        mass_number: 40,
        atomic_number: 20,
        members: &[
            "ca40", "ca41", "ca42", "ca43", "ca44", "ca45", "ca46", "ca47", "ca48", "ca49",
            "sc41", "sc42", "sc43", "sc44", "sc45", "sc46", "sc47", "sc48", "sc49", "sc50",
        ],
    },
    IsotopeGroup {
        mass_number: 44,
        atomic_number: 22,
        members: &[
            "ti44", "ti45", "ti46", "ti47", "ti48", "ti49", "ti50", "ti51", "v45", "v46", "v47",
            "v48", "v49", "v50", "v51", "v52",
        ],
    },
    IsotopeGroup {
        mass_number: 48,
        atomic_number: 24,
        members: &[
            "cr48", "cr49", "cr50", "cr51", "cr52", "cr53", "cr54", "cr55", "cr56", "mn51",
            "mn52", "mn53", "mn54", "mn55", "mn56", "mn57",
        ],
    },
    IsotopeGroup {
        mass_number: 52,
        atomic_number: 26,
        members: &[
            "fe52", "fe53", "fe54", "fe55", "fe56", "fe57", "fe58", "fe59", "fe60", "fe61",
            "co56", "co57", "co58", "co59", "co60", "co61", "co62",
        ],
    },
    IsotopeGroup {
        mass_number: 56,
        atomic_number: 28,
        members: &[
            "ni56", "ni57", "ni58", "ni59", "ni60", "ni61", "ni62", "ni63", "ni64", "ni65",
            "cu57", "cu58", "cu59", "cu60", "cu61", "cu62", "cu63", "cu64", "cu65", "cu66",
            "zn60", "zn61", "zn62", "zn63", "zn64", "zn65", "zn66", "zn67", "zn68", "zn69",
            "ga62", "ga63", "ga64", "ga65", "ga66", "ga67", "ga68", "ga69", "ga70", "ge64",
            "ge65", "ge66", "ge67", "ge68", "ge69", "ge70", "ge71",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn renormalize_makes_each_zone_sum_to_one() {
        let mut comp = Composition::new(2);
        comp.insert("h1", vec![0.5, 1e-99]).unwrap();
        comp.insert("he4", vec![0.3, 2.0]).unwrap();
        comp.insert("o16", vec![0.4, 2.0]).unwrap();
        comp.renormalize();
        for zone in 0..2 {
            assert_relative_eq!(comp.zone_sum(zone), 1.0, epsilon = 1e-15);
        }
        assert_relative_eq!(comp.get("h1").unwrap()[0], 0.5 / 1.2);
    }

    #[test]
    fn renormalize_skips_empty_zone() {
        let mut comp = Composition::new(1);
        comp.insert("he4", vec![0.0]).unwrap();
        comp.renormalize();
        assert_eq!(comp.get("he4").unwrap(), &[0.0]);
    }

    #[test]
    fn lump_sums_present_members() {
        let mut comp = Composition::new(1);
        comp.insert("he3", vec![0.01]).unwrap();
        comp.insert("he4", vec![0.27]).unwrap();
        comp.insert("c12", vec![0.5]).unwrap();
        let helium = comp.lump(&ISOTOPE_GROUPS[0]).unwrap();
        assert_relative_eq!(helium[0], 0.28);
    }

    #[test]
    fn lump_of_untracked_group_is_none() {
        let mut comp = Composition::new(1);
        comp.insert("he4", vec![1.0]).unwrap();
        assert!(comp.lump(&ISOTOPE_GROUPS[12]).is_none());
    }

    #[test]
    fn insert_preserves_network_order() {
        let mut comp = Composition::new(1);
        for name in ["neut", "h1", "he4", "c12"] {
            comp.insert(name, vec![0.25]).unwrap();
        }
        let order: Vec<_> = comp.isotopes().collect();
        assert_eq!(order, ["neut", "h1", "he4", "c12"]);
    }

    #[test]
    fn groups_are_alpha_chain() {
        for (i, group) in ISOTOPE_GROUPS.iter().enumerate() {
            let z = if i == 0 { 2 } else { 2 * (i as u32 + 2) };
            assert_eq!(group.atomic_number, z);
            assert_eq!(group.mass_number, 2 * z);
        }
    }
}
