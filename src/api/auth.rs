use crate::core::credentials::Credentials;
use crate::core::error::AuthError;
use crate::core::models::LoginResult;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use url::Url;

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

#[derive(Debug, Clone)]
pub struct Authenticator {
    client: Client,
    login_url: Url,
}

impl Authenticator {
    pub fn new(client: Client, login_url: Url) -> Self {
        Self { client, login_url }
    }

    fn request(&self, credentials: &Credentials) -> RequestBuilder {
        self.client
            .post(self.login_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_VALUE)
            .json(credentials)
    }

    /// Posts the credentials to the login endpoint. One request, no retries.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResult, AuthError> {
        let response = self
            .request(credentials)
            .send()
            .await
            .map_err(AuthError::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected { status, body });
        }

        let body = response.bytes().await.map_err(AuthError::Request)?;
        let result: LoginResult = serde_json::from_slice(&body)?;

        tracing::debug!(token_len = result.token.len(), "Login succeeded");
        Ok(result)
    }
}
