//! HTTP transfer of template archives.

use std::io::{Cursor, Read};

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::{GpcError, GpcResult};

/// An in-flight download: declared content type plus body stream.
pub struct Download {
    pub content_type: Option<String>,
    pub body: Box<dyn Read>,
}

/// Fetches remote resources.
pub trait Transport {
    fn get(&self, url: &str) -> GpcResult<Download>;
}

/// Blocking HTTP client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> GpcResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("gpc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> GpcResult<Download> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GpcError::Transfer(format!("GET {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(GpcError::Transfer(format!("HTTP {}: {}", response.status(), url)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!("GET {} -> {:?}", url, content_type);

        Ok(Download {
            content_type,
            body: Box::new(response),
        })
    }
}

/// Serves one fixed response for every URL.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    content_type: Option<String>,
    body: Vec<u8>,
    error: Option<String>,
}

impl StaticTransport {
    pub fn new(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            body: body.into(),
            error: None,
        }
    }

    /// A transport whose every request fails.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

impl Transport for StaticTransport {
    fn get(&self, url: &str) -> GpcResult<Download> {
        if let Some(message) = &self.error {
            return Err(GpcError::Transfer(format!("GET {}: {}", url, message)));
        }
        Ok(Download {
            content_type: self.content_type.clone(),
            body: Box::new(Cursor::new(self.body.clone())),
        })
    }
}
