use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Metadata {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "creationTimestamp")]
    pub created_at: DateTime<Utc>,
}

impl Metadata {
    pub fn named(name: &str) -> Self {
        Metadata {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        let id = Uuid::new_v4();
        Metadata {
            id,
            name: id.to_string(),
            created_at: Utc::now(),
        }
    }
}
