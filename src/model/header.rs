use std::fmt;

/// A scalar read from (or destined for) a model header or footer.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Int(i64),
    Float(f64),
    /// Kept verbatim, quotes included.
    Text(String),
}

impl HeaderValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Int(v) => Some(*v as f64),
            HeaderValue::Float(v) => Some(*v),
            HeaderValue::Text(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        HeaderValue::Int(v)
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        HeaderValue::Float(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::Text(v.to_string())
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Int(v) => write!(f, "{v}"),
            HeaderValue::Float(v) => write!(f, "{v}"),
            HeaderValue::Text(v) => f.write_str(v),
        }
    }
}

/// One physical line of a header block: one or more `key value` pairs and an
/// optional trailing `!` comment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderLine {
    pub entries: Vec<(String, HeaderValue)>,
    pub comment: Option<String>,
}

impl HeaderLine {
    pub fn new(key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        Self {
            entries: vec![(key.into(), value.into())],
            comment: None,
        }
    }

    pub fn and(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Ordered header or footer metadata of a stellar model.
///
/// Line grouping is retained so a block can be re-emitted with the same
/// shape it was read with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelHeader {
    lines: Vec<HeaderLine>,
}

impl ModelHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: HeaderLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[HeaderLine] {
        &self.lines
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(HeaderValue::as_f64)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(HeaderValue::as_int)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.lines
            .iter()
            .flat_map(|line| line.entries.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// First of `keys` that is absent, if any.
    pub fn first_missing<'a>(&self, keys: &[&'a str]) -> Option<&'a str> {
        keys.iter().copied().find(|key| !self.contains(key))
    }
}

impl FromIterator<HeaderLine> for ModelHeader {
    fn from_iter<I: IntoIterator<Item = HeaderLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelHeader {
        [
            HeaderLine::new("model_number", 1234_i64),
            HeaderLine::new("net_name", "'approx21.net'"),
            HeaderLine::new("cumulative_error/total_energy", 1e-3_f64)
                .and("log_rel_run_E_err", -4.5_f64),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn lookups_span_multi_entry_lines() {
        let header = sample();
        assert_eq!(header.float("log_rel_run_E_err"), Some(-4.5));
        assert_eq!(header.int("model_number"), Some(1234));
        assert_eq!(header.float("model_number"), Some(1234.0));
        assert_eq!(
            header.get("net_name").and_then(HeaderValue::as_text),
            Some("'approx21.net'")
        );
    }

    #[test]
    fn first_missing_reports_in_request_order() {
        let header = sample();
        assert_eq!(
            header.first_missing(&["model_number", "star_age", "Teff"]),
            Some("star_age")
        );
        assert_eq!(header.first_missing(&["model_number", "net_name"]), None);
    }

    #[test]
    fn entries_preserve_order() {
        let header = sample();
        let keys: Vec<_> = header.entries().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["model_number", "net_name", "cumulative_error/total_energy", "log_rel_run_E_err"]
        );
    }
}
