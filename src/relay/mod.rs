//! The chat relay: one user query in, one upstream `generateContent` call out.
//!
//! Every upstream failure collapses into [`RelayError::Upstream`]. The cause is
//! logged with its [`Error::kind`] and never reaches the caller.

mod prompt;

pub use prompt::build_instruction;

use crate::{
    Error,
    llm::{GenerateContentRequest, LlmClient, ModelInfo},
};
use std::sync::Arc;
use tracing::{debug, error, info};

pub const MISSING_QUERY_MESSAGE: &str = "userQuery is required";
pub const MISSING_CREDENTIAL_MESSAGE: &str = "API key is not configured on the server.";
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "I'm having trouble connecting to my brain. Please try again later.";
pub const MODEL_LISTING_FAILURE_MESSAGE: &str = "Unable to list models right now.";

#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("{}", MISSING_QUERY_MESSAGE)]
    MissingQuery,

    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    #[error("Upstream failure: {0}")]
    Upstream(#[source] Error),
}

impl RelayError {
    /// The message a caller is allowed to see.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingQuery => MISSING_QUERY_MESSAGE,
            Self::MissingCredential => MISSING_CREDENTIAL_MESSAGE,
            Self::Upstream(_) => UPSTREAM_FAILURE_MESSAGE,
        }
    }
}

/// Shared, read-only relay state. Cloning is cheap.
#[derive(Clone)]
pub struct Relay {
    client: Option<Arc<dyn LlmClient>>,
    instruction: Arc<str>,
}

impl Relay {
    /// `client` is `None` when no upstream credential is configured.
    pub fn new(client: Option<Arc<dyn LlmClient>>, instruction: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            instruction: instruction.into(),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }

    pub async fn handle(&self, query: Option<&str>) -> Result<String, RelayError> {
        let query = match query {
            Some(q) if !q.is_empty() => q,
            _ => return Err(RelayError::MissingQuery),
        };

        let Some(client) = &self.client else {
            error!("Rejecting chat request: upstream API key is not configured");
            return Err(RelayError::MissingCredential);
        };

        debug!("Relaying query of {} bytes", query.len());

        let request = GenerateContentRequest::single_turn(&*self.instruction, query);

        let text = client
            .generate_content(request)
            .await
            .and_then(|response| {
                response
                    .first_text()
                    .map(str::to_owned)
                    .ok_or_else(|| Error::llm("response has no candidate text"))
            })
            .map_err(|e| {
                error!(kind = e.kind(), error = %e, "Error calling upstream model");
                RelayError::Upstream(e)
            })?;

        info!("Relayed reply of {} bytes", text.len());
        Ok(text)
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, RelayError> {
        let Some(client) = &self.client else {
            return Err(RelayError::MissingCredential);
        };

        client.list_models().await.map_err(|e| {
            error!(kind = e.kind(), error = %e, "Error listing upstream models");
            RelayError::Upstream(e)
        })
    }
}
