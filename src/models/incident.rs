//! Incident model matching the remote store's JSON shape.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Attachment;
use crate::errors::ClientError;

/// Opaque incident identifier assigned by the remote store.
///
/// Generic REST stores mint either strings or integers; both deserialize into
/// the same opaque form and the client never interprets the content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncidentId(String);

impl IncidentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IncidentId {
    fn from(value: &str) -> Self {
        IncidentId(value.to_string())
    }
}

impl From<String> for IncidentId {
    fn from(value: String) -> Self {
        IncidentId(value)
    }
}

impl Serialize for IncidentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for IncidentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = IncidentId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(IncidentId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(IncidentId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(IncidentId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Incident status as held by the store.
///
/// Open string enum: `Open` and `Closed` are the known values, anything else
/// the store holds round-trips verbatim through `Other`. This client only
/// ever writes `Open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentStatus {
    Open,
    Closed,
    Other(String),
}

impl IncidentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            IncidentStatus::Open => "Open",
            IncidentStatus::Closed => "Closed",
            IncidentStatus::Other(s) => s,
        }
    }
}

impl From<String> for IncidentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Open" => IncidentStatus::Open,
            "Closed" => IncidentStatus::Closed,
            _ => IncidentStatus::Other(value),
        }
    }
}

impl From<IncidentStatus> for String {
    fn from(value: IncidentStatus) -> Self {
        match value {
            IncidentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked incident as mirrored from the remote store.
///
/// Every field except `id` tolerates absence on reads; the display layer
/// substitutes placeholders for blanks, the store is never written with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Creation draft for a new incident. The store assigns the `id`; the client
/// fixes `status` to `Open` and starts with empty comments on submission.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub kind: String,
    pub location: String,
    pub datetime: String,
    pub description: String,
}

impl NewIncident {
    /// Check the client-side precondition: all four fields non-blank.
    /// A violation is a caller error and is never submitted to the store.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.kind.trim().is_empty() {
            return Err(ClientError::Validation("Type is required".to_string()));
        }
        if self.location.trim().is_empty() {
            return Err(ClientError::Validation("Location is required".to_string()));
        }
        if self.datetime.trim().is_empty() {
            return Err(ClientError::Validation("Date/time is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ClientError::Validation(
                "Description is required".to_string(),
            ));
        }
        Ok(())
    }
}
