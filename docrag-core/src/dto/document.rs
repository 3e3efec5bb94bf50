//! Document DTOs

use serde::{Deserialize, Serialize};

use crate::domain::document::Document;

/// One page of the document listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedDocuments {
    pub items: Vec<Document>,
    /// Total number of documents across all pages
    pub count: u64,
}

/// Request to upload a document as raw text content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDocument {
    pub filename: String,
    pub content: String,
}
