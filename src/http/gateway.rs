use std::sync::Arc;
use crate::error::Result;
use crate::http::request::dispatch;
use crate::http::session::SessionManager;
use crate::http::transport::{HttpRequest, HttpResponse, Transport};

pub const SESSION_HEADER: &str = "X-Session";

pub struct RequestGateway {
    transport: Arc<dyn Transport>,
    session: Arc<SessionManager>,
}

impl RequestGateway {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionManager>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        dispatch(self.transport.as_ref(), request).await
    }

    /// Like `request`, with a valid session attached. If logging in fails, that error is returned.
    pub async fn gated_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let session_id = self.session.session_id().await?;
        dispatch(self.transport.as_ref(), request.header(SESSION_HEADER, session_id)).await
    }
}
