use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Active,
    Paused,
    Complete,
    Declined,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Active => "active",
            ConnectionStatus::Paused => "paused",
            ConnectionStatus::Complete => "complete",
            ConnectionStatus::Declined => "declined",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionStatus::Complete | ConnectionStatus::Declined)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub org_id: String,
    pub client_id: String,
    pub helper_id: String,
    pub status: ConnectionStatus,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Connection {
    pub fn new(org_id: String, client_id: String, helper_id: String, created_by_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            org_id,
            client_id,
            helper_id,
            status: ConnectionStatus::Pending,
            created_by_id,
            created_at: Utc::now(),
            accepted_at: None,
            declined_at: None,
            paused_at: None,
            completed_at: None,
        }
    }
}

/// What happened to a connection, as recorded in its history.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ConnectionEventKind {
    Created,
    Accepted,
    Declined,
    Paused,
    Resumed,
    Completed,
}

/// Immutable audit entry appended on creation and on every status change.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEvent {
    pub id: String,
    pub connection_id: String,
    pub transition: ConnectionEventKind,
    pub actor_id: String,
    pub actor_display_name: String,
    pub created_at: DateTime<Utc>,
}

impl ConnectionEvent {
    pub fn new(connection_id: String, transition: ConnectionEventKind, actor_id: String, actor_display_name: String, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            connection_id,
            transition,
            actor_id,
            actor_display_name,
            created_at: at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Unknown media types are stored as images.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "video" => MediaKind::Video,
            "audio" => MediaKind::Audio,
            _ => MediaKind::Image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// Engagement log entry written by the connection's helper.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionUpdate {
    pub id: String,
    pub connection_id: String,
    pub event_name: String,
    pub event_time: DateTime<Utc>,
    pub notes: Option<String>,
    #[sqlx(json)]
    pub media: Vec<MediaItem>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewConnectionUpdateParams {
    pub connection_id: String,
    pub event_name: String,
    pub event_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub media: Vec<MediaItem>,
    pub created_by: String,
}

impl ConnectionUpdate {
    pub fn new(params: NewConnectionUpdateParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            connection_id: params.connection_id,
            event_name: params.event_name,
            event_time: params.event_time,
            notes: params.notes,
            media: params.media,
            created_by: params.created_by,
            created_at: Utc::now(),
        }
    }
}
