use super::composition::Composition;
use indexmap::IndexMap;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column '{field}' has {found} zones but the table has {expected}")]
    ColumnLength {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("required column '{0}' is not present in the zone table")]
    MissingColumn(String),
}

/// A named physical quantity stored per zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Mass interior to the zone's outer boundary (M☉).
    EnclosedMass,
    /// Outer radius of the zone (cm).
    Radius,
    Density,
    Temperature,
    Velocity,
    /// Specific internal plus kinetic energy (erg/g).
    SpecificEnergy,
    Pressure,
    CellVolume,
    GravPotential,
    Luminosity,
    /// Fraction of the envelope mass held by the zone.
    Dq,
    ConvVelocity,
    TotalSpecificEnergy,
    LnR,
    LnD,
    LnT,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::EnclosedMass => "enclosed_mass",
            Field::Radius => "r",
            Field::Density => "density",
            Field::Temperature => "temp",
            Field::Velocity => "v",
            Field::SpecificEnergy => "ener",
            Field::Pressure => "pressure",
            Field::CellVolume => "cell_volume",
            Field::GravPotential => "gpot",
            Field::Luminosity => "L",
            Field::Dq => "dq",
            Field::ConvVelocity => "mlt_vc",
            Field::TotalSpecificEnergy => "total_specific_energy",
            Field::LnR => "lnR",
            Field::LnD => "lnd",
            Field::LnT => "lnT",
        }
    }

    /// Whether diagnostic plots of this quantity use a logarithmic axis.
    pub fn is_log_scaled(&self) -> bool {
        matches!(
            self,
            Field::EnclosedMass
                | Field::Radius
                | Field::Density
                | Field::Pressure
                | Field::Temperature
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered radial zones, innermost first.
///
/// Every column, including each composition column, holds exactly
/// [`len`](ZoneTable::len) values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneTable {
    len: usize,
    columns: IndexMap<Field, Vec<f64>>,
    composition: Composition,
}

impl ZoneTable {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: IndexMap::new(),
            composition: Composition::new(len),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, field: Field, values: Vec<f64>) -> Result<(), TableError> {
        if values.len() != self.len {
            return Err(TableError::ColumnLength {
                field: field.name().to_string(),
                expected: self.len,
                found: values.len(),
            });
        }
        self.columns.insert(field, values);
        Ok(())
    }

    /// Sets every zone of `field` to `value`.
    pub fn fill(&mut self, field: Field, value: f64) {
        self.columns.insert(field, vec![value; self.len]);
    }

    #[inline]
    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn column(&self, field: Field) -> Option<&[f64]> {
        self.columns.get(&field).map(Vec::as_slice)
    }

    pub fn column_mut(&mut self, field: Field) -> Option<&mut [f64]> {
        self.columns.get_mut(&field).map(Vec::as_mut_slice)
    }

    pub fn require(&self, field: Field) -> Result<&[f64], TableError> {
        self.column(field)
            .ok_or_else(|| TableError::MissingColumn(field.name().to_string()))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.keys().copied()
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn composition_mut(&mut self) -> &mut Composition {
        &mut self.composition
    }

    pub fn set_composition(&mut self, composition: Composition) -> Result<(), TableError> {
        if composition.len() != self.len {
            return Err(TableError::ColumnLength {
                field: "composition".to_string(),
                expected: self.len,
                found: composition.len(),
            });
        }
        self.composition = composition;
        Ok(())
    }

    /// Copy of the table with zone order reversed.
    pub fn reversed(&self) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|(field, values)| (*field, values.iter().rev().copied().collect()))
            .collect();
        Self {
            len: self.len,
            columns,
            composition: self.composition.reversed(),
        }
    }

    /// Copy of the zones in `range`.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|(field, values)| (*field, values[range.clone()].to_vec()))
            .collect();
        Self {
            len: range.len(),
            columns,
            composition: self.composition.slice(range),
        }
    }
}
