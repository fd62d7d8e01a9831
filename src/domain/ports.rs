use crate::domain::model::{ApiRequest, ApiResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Sends one request and hands back whatever came over the wire.
/// Non-2xx statuses are responses, not errors; only transport failures are `Err`.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// What the transport needs to reach the API.
pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}
