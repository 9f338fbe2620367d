use crate::io::{Error, Format};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::io::Write;

/// Two-level overrides applied to a TARDIS configuration template,
/// e.g. `supernova.time_explosion`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    sections: IndexMap<String, Mapping>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(Value::String(key.into()), value.into());
        self
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Mapping::is_empty)
    }
}

/// Writes `template` with `overrides` applied and `csvy_model` pointing at
/// the companion model file. Template key order is preserved; new sections
/// and keys are appended.
pub fn write<W: Write>(
    mut writer: W,
    template: &str,
    overrides: &ConfigOverrides,
    csvy_model: &str,
) -> Result<(), Error> {
    let mut config: Mapping = if template.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str(template)?
    };

    for (section, values) in &overrides.sections {
        let entry = config
            .entry(Value::String(section.clone()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        let Value::Mapping(target) = entry else {
            return Err(Error::parse(
                Format::TardisConfig,
                0,
                format!("section '{section}' is not a mapping"),
            ));
        };
        for (key, value) in values {
            target.insert(key.clone(), value.clone());
        }
    }
    config.insert(Value::from("csvy_model"), Value::from(csvy_model));

    writer.write_all(serde_yaml::to_string(&config)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
tardis_config_version: v1.0
supernova:
  luminosity_requested: 1.0e+42 erg/s
  time_explosion: 10 day
atom_data: kurucz_cd23_chianti_H_He.h5
plasma:
  ionization: nebular
  initial_t_inner: 10000 K
montecarlo:
  no_of_packets: 40000
";

    fn render(overrides: &ConfigOverrides) -> Mapping {
        let mut out = Vec::new();
        write(&mut out, TEMPLATE, overrides, "model.csvy").unwrap();
        serde_yaml::from_slice(&out).unwrap()
    }

    #[test]
    fn overrides_replace_nested_values_in_place() {
        let mut overrides = ConfigOverrides::new();
        overrides
            .set("supernova", "time_explosion", "12.345 day")
            .set("plasma", "initial_t_inner", "8000.5 K");
        let config = render(&overrides);

        assert_eq!(config["supernova"]["time_explosion"], Value::from("12.345 day"));
        assert_eq!(
            config["supernova"]["luminosity_requested"],
            Value::from("1.0e+42 erg/s")
        );
        assert_eq!(config["plasma"]["initial_t_inner"], Value::from("8000.5 K"));
        assert_eq!(config["plasma"]["ionization"], Value::from("nebular"));
        assert_eq!(config["csvy_model"], Value::from("model.csvy"));

        let keys: Vec<&str> = config.keys().filter_map(Value::as_str).collect();
        assert_eq!(
            keys,
            [
                "tardis_config_version",
                "supernova",
                "atom_data",
                "plasma",
                "montecarlo",
                "csvy_model"
            ]
        );
    }

    #[test]
    fn missing_sections_are_created() {
        let mut overrides = ConfigOverrides::new();
        overrides.set("spectrum", "num", 2000_i64);
        let config = render(&overrides);
        assert_eq!(config["spectrum"]["num"], Value::from(2000_i64));
    }

    #[test]
    fn scalar_section_cannot_take_overrides() {
        let mut overrides = ConfigOverrides::new();
        overrides.set("atom_data", "path", "x");
        let err = write(Vec::new(), TEMPLATE, &overrides, "m.csvy").unwrap_err();
        assert!(err.to_string().contains("atom_data"));
    }

    #[test]
    fn overrides_report_emptiness() {
        let mut overrides = ConfigOverrides::new();
        assert!(overrides.is_empty());
        overrides.set("supernova", "time_explosion", "1.000 day");
        assert!(!overrides.is_empty());
        assert_eq!(
            overrides.get("supernova", "time_explosion"),
            Some(&Value::from("1.000 day"))
        );
    }
}
