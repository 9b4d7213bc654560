use std::collections::HashMap;
use async_trait::async_trait;
use http::Method;
use log::debug;
use reqwest::header::{ORIGIN, REFERER};
use reqwest::Client;
use url::Url;
use crate::config::ApiConfig;
use crate::error::{Result, VaultKeyError};

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: &serde_json::Value) -> Self {
        self.headers.push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body.to_string());
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Sends a request and hands back whatever the server answered, whatever the status.
/// Only failures to get a response at all are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

pub struct ReqwestTransport {
    client: Client,
    vendor_hosts: Vec<String>,
    referer: String,
    origin: String,
}

impl ReqwestTransport {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(api.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| VaultKeyError::Network(format!("Failed to build client: {}", e)))?;

        let vendor_hosts = [api.base_url.as_str(), api.widget_base_url.as_str()]
            .iter()
            .filter_map(|u| Url::parse(u).ok())
            .filter_map(|u| u.host_str().map(str::to_string))
            .collect();

        Ok(Self {
            client,
            vendor_hosts,
            referer: api.referer.clone(),
            origin: api.origin.clone(),
        })
    }

    /// The vendor only accepts calls that look like they came from its own VIP page.
    fn is_vendor_url(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| self.vendor_hosts.iter().any(|h| h == host))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = Url::parse(&request.url)
            .map_err(|e| VaultKeyError::Network(format!("Invalid URL {}: {}", request.url, e)))?;
        let vendor = self.is_vendor_url(&url);

        let mut builder = self.client.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if vendor {
            builder = builder
                .header(REFERER, self.referer.as_str())
                .header(ORIGIN, self.origin.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| VaultKeyError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| VaultKeyError::Network(format!("Failed to get response body: {}", e)))?;

        debug!("Response body length {} from {}", body.len(), request.url);

        Ok(HttpResponse { status, headers, body })
    }
}
