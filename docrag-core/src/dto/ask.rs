//! Ask request DTO

use serde::{Deserialize, Serialize};

/// Request to start an answering task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// How many retrieved chunks the backend hands to the generator
    #[serde(default = "default_num_chunks")]
    pub num_chunks: usize,
}

impl AskRequest {
    /// Creates a request with the default chunk count
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            num_chunks: default_num_chunks(),
        }
    }

    /// Overrides the retrieved chunk count
    pub fn with_num_chunks(mut self, num_chunks: usize) -> Self {
        self.num_chunks = num_chunks;
        self
    }
}

fn default_num_chunks() -> usize {
    5
}
