use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub age: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub story: Option<String>,
    pub notes: Option<String>,
    #[sqlx(json)]
    pub needs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(org_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            org_id,
            name,
            age: None,
            bio: None,
            address: None,
            contact: None,
            story: None,
            notes: None,
            needs: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
