//! Fakes for driving `VaultKey` without a network.

use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::Mutex;
use crate::error::{Result, VaultKeyError};
use crate::http::{HttpRequest, HttpResponse, Transport};

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync;

/// Answers every request with `handler` and keeps a copy of what was sent.
pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A transport where nothing ever answers.
    pub fn offline() -> Arc<Self> {
        Self::new(|request| Err(VaultKeyError::Network(format!("no route to {}", request.url))))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&HttpRequest) -> bool) -> usize {
        self.requests.lock().iter().filter(|r| predicate(r)).count()
    }

    pub fn count_containing(&self, fragment: &str) -> usize {
        self.count(|r| r.url.contains(fragment))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());
        (self.handler)(&request)
    }
}
