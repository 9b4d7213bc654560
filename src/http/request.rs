use log::{error, info};
use serde::de::DeserializeOwned;
use crate::error::{Result, VaultKeyError};
use crate::http::transport::{HttpRequest, HttpResponse, Transport};

/// Sends `request`; any status >= 400 comes back as `HttpStatus` carrying the body.
pub async fn dispatch(transport: &dyn Transport, request: HttpRequest) -> Result<HttpResponse> {
    let method = request.method.clone();
    let url = request.url.clone();
    info!("Preparing request to {} {}", method, url);

    let response = transport.execute(request).await?;
    info!("Response from {} {} status code {}", method, url, response.status);

    if response.is_error() {
        Err(VaultKeyError::HttpStatus {
            status: response.status,
            body: response.body,
        })
    } else {
        Ok(response)
    }
}

/// Parses a JSON body. Failures are logged with the offending text and then returned.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        error!("Could not parse JSON string {}: {}", body, e);
        VaultKeyError::MalformedJson(e)
    })
}
