use crate::domain::{FunctionDescription, SubscriptionRecord};
use crate::library::http::{endpoint, HttpClient};
use async_trait::async_trait;
use hyper::http::uri::InvalidUri;
use hyper::{body, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};

const FUNCTION_LIST_PATH: &str = "system/functions";

/// Errors raised while listing the subscriptions of deployed functions
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Request could not be sent or the response could not be read
    #[error("registry unreachable")]
    Unreachable(#[from] hyper::Error),
    /// Registry responded with something other than a success
    #[error("registry responded with status {0}")]
    UnexpectedStatus(StatusCode),
    /// Response is not a list of function descriptions
    #[error("registry returned a malformed response")]
    MalformedResponse(#[from] serde_json::Error),
    /// Gateway URL can not be used to build the request
    #[error("invalid registry url")]
    InvalidUrl(#[from] InvalidUri),
}

/// Source of topic subscriptions
#[async_trait]
pub trait SubscriptionSource {
    /// Lists all current subscriptions, failing as a whole if any part of the lookup fails
    async fn build(&self) -> Result<Vec<SubscriptionRecord>, RegistryError>;
}

/// Lists the subscriptions declared by functions deployed behind the gateway
pub struct GatewayRegistry {
    client: HttpClient,
    base_url: String,
}

impl GatewayRegistry {
    /// Creates a new instance from raw parts
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SubscriptionSource for GatewayRegistry {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn build(&self) -> Result<Vec<SubscriptionRecord>, RegistryError> {
        let uri = endpoint(&self.base_url, FUNCTION_LIST_PATH)?;
        let response = self.client.get(uri).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::UnexpectedStatus(status));
        }

        let bytes = body::to_bytes(response.into_body()).await?;
        let functions: Vec<FunctionDescription> = serde_json::from_slice(&bytes)?;

        debug!(functions = functions.len(), "Listed functions");

        Ok(functions
            .iter()
            .flat_map(|function| function.subscriptions())
            .collect())
    }
}
