use crate::core::error::FetchError;
use reqwest::{Client, RequestBuilder, StatusCode};
use url::Url;

pub const AUTH_HEADER: &str = "x-authorization";

#[derive(Debug, Clone)]
pub struct DataFetcher {
    client: Client,
    resource_url: Url,
}

impl DataFetcher {
    pub fn new(client: Client, resource_url: Url) -> Self {
        Self {
            client,
            resource_url,
        }
    }

    fn request(&self, token: &str) -> RequestBuilder {
        self.client
            .get(self.resource_url.clone())
            .header(AUTH_HEADER, format!("Bearer {}", token))
    }

    /// Fetches the protected resource and returns the body untouched.
    pub async fn fetch_protected_resource(&self, token: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .request(token)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Rejected { status, body });
        }

        let body = response.bytes().await.map_err(FetchError::Request)?;
        Ok(body.to_vec())
    }
}
