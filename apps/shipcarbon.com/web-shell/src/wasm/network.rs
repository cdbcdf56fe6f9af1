use super::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(super) enum TransportError {
    #[error("failed to serialize access request: {0}")]
    Serialize(String),
    #[error("failed to build access request: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Same-origin `fetch` through `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct GlooAccessRequestTransport;

#[async_trait(?Send)]
impl AccessRequestTransport for GlooAccessRequestTransport {
    type Error = TransportError;

    async fn post_access_request(
        &self,
        path: &str,
        request: &AccessRequest,
    ) -> Result<TransportResponse, Self::Error> {
        let body = serde_json::to_string(request)
            .map_err(|error| TransportError::Serialize(error.to_string()))?;
        let response = Request::post(path)
            .header("content-type", "application/json")
            .body(body)
            .map_err(|error| TransportError::Build(error.to_string()))?
            .send()
            .await
            .map_err(|error| TransportError::Network(error.to_string()))?;
        Ok(TransportResponse {
            status: response.status(),
        })
    }
}
