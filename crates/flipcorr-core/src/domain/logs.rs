use super::FlipperState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const FLIPPER_LOG: &str = "flipper";
pub const POLARISATION_LOG: &str = "polarisation";
pub const DETEROTA_LOG: &str = "deterota";
pub const WAVELENGTH_LOG: &str = "wavelength";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    Number(f64),
    Text(String),
}

impl LogValue {
    /// Numeric text becomes a number, anything else stays text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(_) => None,
        }
    }
}

impl Display for LogValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleLogs {
    values: BTreeMap<String, LogValue>,
}

impl SampleLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: LogValue) -> Option<LogValue> {
        self.values.insert(name.into(), value)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.values.insert(name.into(), LogValue::Text(text.into()));
    }

    /// Adds comma-separated log names with matching comma-separated values,
    /// parsing numeric values. Surplus names or values are ignored.
    pub fn add_multiple(&mut self, names: &str, values: &str) {
        for (name, value) in names.split(',').zip(values.split(',')) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.values.insert(name.to_string(), LogValue::parse(value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&LogValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// `None` both for a missing log and for a value that is not ON/OFF.
    pub fn flipper(&self) -> Option<FlipperState> {
        self.get(FLIPPER_LOG)?.as_text()?.parse().ok()
    }

    pub fn polarisation(&self) -> Option<&str> {
        self.get(POLARISATION_LOG)?.as_text()
    }

    pub fn deterota(&self) -> Option<f64> {
        self.get(DETEROTA_LOG)?.as_number()
    }

    pub fn wavelength(&self) -> Option<f64> {
        self.get(WAVELENGTH_LOG)?.as_number()
    }
}

#[cfg(test)]
mod tests {
    use super::{LogValue, SampleLogs};
    use crate::domain::FlipperState;

    #[test]
    fn add_multiple_parses_numbers_and_text() {
        let mut logs = SampleLogs::new();
        logs.add_multiple(
            "deterota,wavelength,polarisation,flipper",
            "-7.53,4.2,x,ON",
        );

        assert_eq!(logs.len(), 4);
        assert_eq!(logs.deterota(), Some(-7.53));
        assert_eq!(logs.wavelength(), Some(4.2));
        assert_eq!(logs.polarisation(), Some("x"));
        assert_eq!(logs.flipper(), Some(FlipperState::On));
    }

    #[test]
    fn unknown_flipper_text_reads_as_absent() {
        let mut logs = SampleLogs::new();
        assert_eq!(logs.flipper(), None);

        logs.insert_text("flipper", "sideways");
        assert_eq!(logs.flipper(), None);

        logs.insert("flipper", LogValue::Number(1.0));
        assert_eq!(logs.flipper(), None);
    }

    #[test]
    fn logs_serialize_as_plain_json_object() {
        let mut logs = SampleLogs::new();
        logs.add_multiple("flipper,wavelength", "OFF,4.2");

        let json = serde_json::to_string(&logs).expect("logs should serialize");
        assert_eq!(json, r#"{"flipper":"OFF","wavelength":4.2}"#);

        let parsed: SampleLogs = serde_json::from_str(&json).expect("logs should parse");
        assert_eq!(parsed, logs);
    }
}
