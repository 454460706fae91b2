//! Cheap structural probing of raw payloads.
//!
//! Processors decide whether they can handle a payload by looking at a few
//! discriminating fields. [`Probe`] reads only those fields and skips the rest
//! of the document without building it.

use crate::wire::nullable;
use serde::{Deserialize, Deserializer};

/// The discriminating fields of a payload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Probe {
    #[serde(default)]
    pub(crate) version: Field,
    #[serde(default, deserialize_with = "nullable")]
    pub(crate) request_context: ProbeContext,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProbeContext {
    #[serde(default)]
    pub(crate) api_id: Field,
    #[serde(default)]
    pub(crate) elb: Field,
}

/// Presence of a key, plus its value when that value is a string.
///
/// A key set to `null` counts as present.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Field {
    pub(crate) present: bool,
    pub(crate) text: Option<String>,
}

impl Field {
    pub(crate) fn is(&self, expected: &str) -> bool {
        self.text.as_deref() == Some(expected)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self {
            present: true,
            text: value.as_str().map(str::to_string),
        })
    }
}

impl Probe {
    /// Reads the discriminating fields, or `None` if the payload is not a
    /// JSON object of the expected shape.
    pub(crate) fn read(payload: &[u8]) -> Option<Self> {
        serde_json::from_slice(payload).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_fields() {
        let probe = Probe::read(br#"{"version":"2.0","requestContext":{"apiId":"id"}}"#)
            .expect("payload is an object");
        assert!(probe.version.present);
        assert!(probe.version.is("2.0"));
        assert!(probe.request_context.api_id.present);
        assert!(!probe.request_context.elb.present);
    }

    #[test]
    fn test_null_counts_as_present() {
        let probe = Probe::read(br#"{"version":null}"#).unwrap();
        assert!(probe.version.present);
        assert!(probe.version.text.is_none());
    }

    #[test]
    fn test_null_request_context_is_empty() {
        let probe = Probe::read(br#"{"requestContext":null}"#).unwrap();
        assert!(!probe.request_context.api_id.present);
    }

    #[test]
    fn test_malformed_payloads_do_not_probe() {
        assert!(Probe::read(b"{").is_none());
        assert!(Probe::read(b"").is_none());
    }
}
