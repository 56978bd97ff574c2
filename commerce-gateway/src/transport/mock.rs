//! In-memory transport for tests.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{GatewayError, Result},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Transport that replays queued responses and records every request it receives.
///
/// An exhausted queue answers with [`GatewayError::Transport`].
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw response.
    pub fn push(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(TransportResponse { status, body: body.into(), headers: Vec::new() });
    }

    /// Queues a JSON response.
    pub fn push_json(&self, status: u16, body: &Value) {
        self.push(status, body.to_string());
    }

    /// Returns a copy of every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| GatewayError::Transport("no mock response queued".to_owned()))
    }

    fn protocol_name(&self) -> &'static str {
        "mock"
    }
}
