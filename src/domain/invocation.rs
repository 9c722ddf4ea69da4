use super::FunctionIdentifier;
use crate::library::BoxedError;

/// Outcome of a single function invocation
///
/// Only used for logging, the outcome never influences whether a message is acknowledged.
#[derive(Debug)]
pub struct InvocationResult {
    /// Function that has been invoked
    pub function: FunctionIdentifier,
    /// HTTP status returned by the gateway, if a response was received
    pub status: Option<u16>,
    /// Response body, empty if none was read
    pub body: Vec<u8>,
    /// Transport or body read error
    pub error: Option<BoxedError>,
}

impl InvocationResult {
    /// Invocation which received a complete response
    pub fn completed(function: impl Into<FunctionIdentifier>, status: u16, body: Vec<u8>) -> Self {
        Self {
            function: function.into(),
            status: Some(status),
            body,
            error: None,
        }
    }

    /// Invocation which failed, optionally after the status has already been received
    pub fn failed(
        function: impl Into<FunctionIdentifier>,
        status: Option<u16>,
        error: impl Into<BoxedError>,
    ) -> Self {
        Self {
            function: function.into(),
            status,
            body: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Whether a response with a 2xx status has been received in full
    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status, Some(200..=299))
    }
}
