use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use uuid::Uuid;

/// One registration: field values in catalogue order plus the time it was received.
///
/// Serializes as a flat JSON object, fields first and `timestamp_utc` last.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    fields: Vec<(String, String)>,
    pub timestamp_utc: DateTime<Utc>,
}

impl Submission {
    pub fn new(fields: Vec<(String, String)>, timestamp_utc: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            fields,
            timestamp_utc,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp_utc
            .format("%Y-%m-%dT%H:%M:%S%.6fZ")
            .to_string()
    }

    /// Pretty-printed UTF-8 JSON, as stored in `metadata.json`.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("timestamp_utc", &self.timestamp_string())?;
        map.end()
    }
}
