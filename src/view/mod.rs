//! Pure projection from mirrored incident state to display rows.
//!
//! The projection applies the read-side display contract: blank or absent
//! fields render as literal placeholder text, and attachments with an
//! unrecognized data-URI scheme render as a fixed placeholder image. None of
//! this ever flows back into the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{Incident, IncidentStatus, MediaKind};

pub const PLACEHOLDER_TYPE: &str = "Unknown Type";
pub const PLACEHOLDER_LOCATION: &str = "Unknown Location";
pub const PLACEHOLDER_STATUS: &str = "Unknown Status";
pub const PLACEHOLDER_TIME: &str = "Unknown Time";
pub const PLACEHOLDER_DESCRIPTION: &str = "No description provided";

/// Fixed stand-in for attachments the renderer cannot classify.
pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder.png";

/// What the current view was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterContext {
    All,
    Status(IncidentStatus),
    Search(String),
}

/// Renderable media reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "src")]
pub enum MediaRef {
    Image(String),
    Video(String),
}

/// One incident prepared for display, placeholders applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub status: String,
    pub datetime: String,
    pub description: String,
    pub comments: Vec<String>,
    pub media: Vec<MediaRef>,
}

/// The projected board: rows plus the context they were filtered under.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub context: FilterContext,
    pub rows: Vec<IncidentRow>,
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize a datetime for display. RFC 3339 and the HTML
/// `YYYY-MM-DDTHH:MM` form are recognized; anything else (including legacy
/// locale-formatted values) passes through raw.
fn display_datetime(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER_TIME.to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    trimmed.to_string()
}

fn project_row(incident: &Incident) -> IncidentRow {
    let status = match &incident.status {
        Some(status) => or_placeholder(status.as_str(), PLACEHOLDER_STATUS),
        None => PLACEHOLDER_STATUS.to_string(),
    };

    let media = incident
        .attachments
        .iter()
        .map(|attachment| match attachment.media_kind() {
            MediaKind::Image => MediaRef::Image(attachment.as_str().to_string()),
            MediaKind::Video => MediaRef::Video(attachment.as_str().to_string()),
            MediaKind::Unknown => MediaRef::Image(PLACEHOLDER_IMAGE.to_string()),
        })
        .collect();

    IncidentRow {
        id: incident.id.to_string(),
        kind: or_placeholder(&incident.kind, PLACEHOLDER_TYPE),
        location: or_placeholder(&incident.location, PLACEHOLDER_LOCATION),
        status,
        datetime: display_datetime(&incident.datetime),
        description: or_placeholder(&incident.description, PLACEHOLDER_DESCRIPTION),
        comments: incident.comments.clone(),
        media,
    }
}

/// Project the cached incidents into display rows under the given context.
pub fn project(incidents: &[Incident], context: FilterContext) -> BoardView {
    BoardView {
        context,
        rows: incidents.iter().map(project_row).collect(),
    }
}
