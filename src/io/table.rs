use super::{Error, Format, util};

/// A whitespace-delimited numeric table addressed by column name.
///
/// Names are resolved once per lookup against the header row read from the
/// file, so a reordered column layout never shifts values between fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ColumnTable {
    /// Builds a table from a header row and its data lines.
    ///
    /// `first_line` is the 1-based line number of `rows[0]`, used in errors.
    /// Blank lines are skipped.
    pub fn parse<S: AsRef<str>>(
        format: Format,
        names: Vec<String>,
        rows: &[S],
        first_line: usize,
    ) -> Result<Self, Error> {
        let mut columns = vec![Vec::with_capacity(rows.len()); names.len()];
        for (offset, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if util::is_blank(row) {
                continue;
            }
            let line_no = first_line + offset;
            let values = util::parse_values(row, format, line_no)?;
            if values.len() != names.len() {
                return Err(Error::parse(
                    format,
                    line_no,
                    format!(
                        "expected {} columns but found {}",
                        names.len(),
                        values.len()
                    ),
                ));
            }
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }
        Ok(Self { names, columns })
    }

    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        Self { names, columns }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.position(name).map(|i| self.columns[i].as_slice())
    }

    pub fn require(&self, format: Format, name: &str) -> Result<&[f64], Error> {
        self.column(name)
            .ok_or_else(|| Error::missing_column(format, name))
    }

    /// Values of row `index` in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.columns.iter().map(move |column| column[index])
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
