use crate::io::{Error, Format, numfmt};
use crate::model::types::is_valid_nuclide_or_element;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::io::Write;
use tracing::warn;

const DOCUMENT_MARKER: &str = "---";
const DATATYPE_KEY: &str = "datatype:";

/// Shell data destined for a CSVY model, one named column per quantity.
pub type ShellTable = IndexMap<String, Vec<f64>>;

/// Writes a CSVY model.
///
/// Everything in `template` up to and including the first `---` is copied,
/// then its YAML header (up to `datatype:` or the closing `---`) is re-emitted
/// with `overrides` applied and a `datatype.fields` list generated from
/// `table`, then the closing marker and the CSV body.
pub fn write<W: Write>(
    mut writer: W,
    template: &str,
    overrides: &Mapping,
    table: &ShellTable,
) -> Result<(), Error> {
    let lines: Vec<&str> = template.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.trim_end() == DOCUMENT_MARKER)
        .ok_or_else(|| Error::MissingMarker {
            format: Format::Csvy,
            marker: DOCUMENT_MARKER.to_string(),
        })?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| {
            let line = line.trim_end();
            line == DATATYPE_KEY || line == DOCUMENT_MARKER
        })
        .map_or(lines.len(), |offset| start + 1 + offset);

    let yaml_text = lines[start + 1..end].join("\n");
    let mut header = if yaml_text.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str::<Mapping>(&yaml_text)?
    };
    for (key, value) in overrides {
        header.insert(key.clone(), value.clone());
    }

    let fields = field_descriptors(table)?;
    let names: Vec<String> = fields.iter().map(|field| field.name.clone()).collect();
    let mut datatype = Mapping::new();
    datatype.insert(
        Value::from("fields"),
        Value::Sequence(fields.into_iter().map(Field::into_yaml).collect()),
    );
    header.insert(Value::from("datatype"), Value::Mapping(datatype));

    for line in &lines[..=start] {
        writeln!(writer, "{line}")?;
    }
    writer.write_all(serde_yaml::to_string(&header)?.as_bytes())?;
    writeln!(writer, "{DOCUMENT_MARKER}")?;

    writeln!(writer, "{}", names.join(","))?;
    let columns: Vec<&[f64]> = names
        .iter()
        .filter_map(|name| table.get(name).map(Vec::as_slice))
        .collect();
    let rows = columns.first().map_or(0, |column| column.len());
    for row in 0..rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| numfmt::scientific(column[row], 5, 'e'))
            .collect();
        writeln!(writer, "{}", cells.join(","))?;
    }
    Ok(())
}

struct Field {
    name: String,
    unit: Option<&'static str>,
    desc: String,
}

impl Field {
    fn into_yaml(self) -> Value {
        let mut map = Mapping::new();
        map.insert(Value::from("name"), Value::from(self.name));
        if let Some(unit) = self.unit {
            map.insert(Value::from("unit"), Value::from(unit));
        }
        map.insert(Value::from("desc"), Value::from(self.desc));
        Value::Mapping(map)
    }
}

fn field_descriptors(table: &ShellTable) -> Result<Vec<Field>, Error> {
    for required in ["velocity", "density"] {
        if !table.contains_key(required) {
            return Err(Error::missing_column(Format::Csvy, required));
        }
    }

    let mut fields = vec![
        Field {
            name: "velocity".into(),
            unit: Some("cm/s"),
            desc: "velocities of shell outer bounderies.".into(),
        },
        Field {
            name: "density".into(),
            unit: Some("g/cm^3"),
            desc: "density within shell with corresponding outer velocity.".into(),
        },
    ];
    if table.contains_key("t_rad") {
        fields.push(Field {
            name: "t_rad".into(),
            unit: Some("K"),
            desc: "radiative temperature within shell with corresponding outer velocity.".into(),
        });
    }
    if table.contains_key("dilution_factor") {
        fields.push(Field {
            name: "dilution_factor".into(),
            unit: None,
            desc: "dilution factor within shell with corresponding outer velocity.".into(),
        });
    }

    for name in table.keys() {
        if matches!(
            name.as_str(),
            "velocity" | "density" | "t_rad" | "dilution_factor"
        ) {
            continue;
        }
        if is_valid_nuclide_or_element(name) {
            fields.push(Field {
                name: name.clone(),
                unit: None,
                desc: format!("fractional {name} abundance"),
            });
        } else {
            warn!(column = %name, "not a valid nuclide; omitted from the CSVY model");
        }
    }
    Ok(fields)
}
