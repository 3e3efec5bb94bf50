//! Docrag HTTP Client
//!
//! A simple, type-safe HTTP client for communicating with the docrag
//! backend API.
//!
//! The backend answers questions asynchronously: submitting a question
//! starts a background task, and the answer is fetched by polling the
//! task status endpoint.
//!
//! # Example
//!
//! ```no_run
//! use docrag_client::RagApiClient;
//! use docrag_core::dto::ask::AskRequest;
//!
//! #[tokio::main]
//! async fn main() -> docrag_client::Result<()> {
//!     let client = RagApiClient::new("http://localhost:8000");
//!
//!     // Start an answering task
//!     let handle = client.ask_question(AskRequest::new("What is RAG?")).await?;
//!
//!     println!("Started task: {}", handle.task_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod documents;
mod qa;

// Re-export commonly used types
pub use error::{ClientError, Result};

use docrag_core::dto::health::Healthcheck;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the docrag backend API
///
/// This client provides methods for all backend endpoints, organized into
/// logical groups:
/// - Question answering (submit, poll task status)
/// - Document management (paginated listing, upload)
/// - Health check
#[derive(Debug, Clone)]
pub struct RagApiClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl RagApiClient {
    /// Create a new backend client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use docrag_client::RagApiClient;
    ///
    /// let client = RagApiClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API
    /// * `client` - A configured reqwest Client
    ///
    /// # Example
    /// ```
    /// use docrag_client::RagApiClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = RagApiClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the backend is up and serving requests
    pub async fn healthcheck(&self) -> Result<Healthcheck> {
        let url = format!("{}/api/healthcheck", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
