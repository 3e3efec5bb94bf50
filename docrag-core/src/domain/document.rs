//! Document domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uploaded document record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
