use crate::domain::InvocationResult;
use crate::library::http::{endpoint, HttpClient};
use async_trait::async_trait;
use hyper::http::uri::InvalidUri;
use hyper::{body, Body, Request, Response};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

/// Errors raised while invoking a function
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Function name can not be used to build the request
    #[error("invalid invocation url")]
    InvalidUrl(#[from] InvalidUri),
    /// Request could not be constructed
    #[error("unable to build request")]
    Request(#[from] hyper::http::Error),
    /// Request could not be sent or no response was received
    #[error("transport error: {0}")]
    Transport(#[source] hyper::Error),
    /// Response body could not be read
    #[error("unable to read response body: {0}")]
    BodyRead(#[source] hyper::Error),
    /// Invocation did not complete in time
    #[error("invocation timed out after {0:?}")]
    Timeout(Duration),
}

/// Invokes functions with message payloads
#[async_trait]
pub trait FunctionInvoker {
    /// Delivers the payload to the function. Failures are reported through the result, never retried.
    async fn invoke(&self, function: &str, payload: &[u8]) -> InvocationResult;
}

/// Invokes functions through the HTTP interface of the gateway
pub struct GatewayInvoker {
    client: HttpClient,
    base_url: String,
    timeout: Duration,
    print_response: bool,
}

impl GatewayInvoker {
    /// Creates a new instance which aborts invocations after `timeout`
    pub fn new(client: HttpClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
            print_response: false,
        }
    }

    /// Includes response bodies in the log output
    pub fn print_response(mut self, print_response: bool) -> Self {
        self.print_response = print_response;
        self
    }

    async fn send(&self, function: &str, payload: &[u8]) -> Result<Response<Body>, DispatchError> {
        let uri = endpoint(&self.base_url, &format!("function/{}", function))?;
        let request = Request::post(uri).body(Body::from(payload.to_vec()))?;

        self.client
            .request(request)
            .await
            .map_err(DispatchError::Transport)
    }

    async fn exchange(&self, function: &str, payload: &[u8]) -> InvocationResult {
        let response = match self.send(function, payload).await {
            Ok(response) => response,
            Err(error) => return InvocationResult::failed(function, None, error),
        };

        let status = response.status().as_u16();

        match body::to_bytes(response.into_body()).await {
            Ok(bytes) => InvocationResult::completed(function, status, bytes.to_vec()),
            Err(error) => {
                InvocationResult::failed(function, Some(status), DispatchError::BodyRead(error))
            }
        }
    }

    fn log(&self, result: &InvocationResult) {
        let function = &result.function;
        let status = result.status;
        let body = self
            .print_response
            .then(|| String::from_utf8_lossy(&result.body).into_owned());

        if let Some(error) = &result.error {
            warn!(%function, ?status, %error, "Invocation failed");
        } else if result.is_success() {
            info!(%function, ?status, ?body, "Invoked function");
        } else {
            warn!(%function, ?status, ?body, "Function responded with an error");
        }
    }
}

#[async_trait]
impl FunctionInvoker for GatewayInvoker {
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn invoke(&self, function: &str, payload: &[u8]) -> InvocationResult {
        let result = match timeout(self.timeout, self.exchange(function, payload)).await {
            Ok(result) => result,
            Err(_) => InvocationResult::failed(function, None, DispatchError::Timeout(self.timeout)),
        };

        self.log(&result);
        result
    }
}
