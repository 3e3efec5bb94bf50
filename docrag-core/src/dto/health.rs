//! Healthcheck DTO

use serde::{Deserialize, Serialize};

/// Response of the backend healthcheck endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Healthcheck {
    pub status: String,
    pub message: String,
}
