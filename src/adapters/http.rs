use crate::domain::model::{ApiRequest, ApiResponse, HttpMethod};
use crate::domain::ports::{ApiTransport, ConfigProvider};
use crate::utils::error::{Result, SmokeError};
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

/// reqwest-backed transport rooted at a base URL such as `http://localhost:5000/api`.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.base_url()).map_err(|e| SmokeError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: config.base_url().to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(SmokeError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: config.base_url().to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Appends the request's segments to the base path, percent-encoding each one.
    pub fn build_url(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| SmokeError::ConfigError {
                message: format!("Base URL cannot have path segments: {}", self.base_url),
            })?;
            segments.pop_if_empty();
            segments.extend(request.segments.iter());
        }

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        Ok(url)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait::async_trait]
impl ApiTransport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.build_url(request)?;
        tracing::debug!("📡 {} {}", request.method, url);

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        tracing::debug!("📡 API response status: {}", status);

        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}
