use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the selected brew profile.
///
/// The brewer reports the profile index as a number. Older firmware builds
/// reported a profile name instead, so both shapes are accepted on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModeValue {
    Index(u32),
    Name(String),
}

impl Default for ModeValue {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl From<u32> for ModeValue {
    fn from(index: u32) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for ModeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Snapshot returned by `GET /status`
///
/// `remaining` is the countdown in whole seconds. An unsigned type means a
/// negative or fractional value on the wire is rejected as malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MachineStatus {
    pub remaining: u32,
    pub mode: ModeValue,
    pub is_on: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_mode() {
        let status: MachineStatus =
            serde_json::from_str(r#"{"remaining":300,"mode":2,"is_on":true}"#).unwrap();

        assert_eq!(
            status,
            MachineStatus {
                remaining: 300,
                mode: ModeValue::Index(2),
                is_on: true,
            }
        );
    }

    #[test]
    fn parses_named_mode() {
        let status: MachineStatus =
            serde_json::from_str(r#"{"remaining":0,"mode":"espresso","is_on":false}"#).unwrap();

        assert_eq!(status.mode, ModeValue::Name("espresso".to_string()));
        assert_eq!(status.mode.to_string(), "espresso");
    }

    #[test]
    fn rejects_missing_fields() {
        let result = serde_json::from_str::<MachineStatus>(r#"{"remaining":12,"mode":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_remaining() {
        let result =
            serde_json::from_str::<MachineStatus>(r#"{"remaining":-5,"mode":1,"is_on":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_index_as_plain_number() {
        let status = MachineStatus {
            remaining: 42,
            mode: 1.into(),
            is_on: true,
        };

        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"remaining":42,"mode":1,"is_on":true}"#
        );
    }
}
