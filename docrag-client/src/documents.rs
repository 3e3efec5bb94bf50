//! Document management API endpoints

use crate::RagApiClient;
use crate::error::Result;
use docrag_core::domain::document::Document;
use docrag_core::dto::document::{PaginatedDocuments, UploadDocument};
use tracing::debug;

impl RagApiClient {
    // =============================================================================
    // Document Management
    // =============================================================================

    /// List uploaded documents, one page at a time
    ///
    /// # Arguments
    /// * `page` - Page number, starting at 1
    /// * `page_size` - Number of documents per page
    ///
    /// # Returns
    /// The requested page plus the total document count
    pub async fn list_documents(&self, page: u32, page_size: u32) -> Result<PaginatedDocuments> {
        let url = format!("{}/api/documents", self.base_url);
        debug!("Fetching documents page {} (size {})", page, page_size);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Upload a document for ingestion
    ///
    /// The backend stores the record immediately and processes the content
    /// (chunking, embedding) in the background.
    ///
    /// # Arguments
    /// * `req` - Filename and raw text content
    ///
    /// # Returns
    /// The created document record
    pub async fn upload_document(&self, req: UploadDocument) -> Result<Document> {
        let url = format!("{}/api/upload", self.base_url);
        debug!("Uploading document {}", req.filename);

        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }
}
