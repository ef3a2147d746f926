mod auth;
mod resource;

use crate::core::settings::ApiSettings;

pub use auth::Authenticator;
pub use resource::DataFetcher;

/// Builds the HTTP client shared by every cycle.
pub fn build_http_client(settings: &ApiSettings) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = settings.request_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Base URL of a local port with nothing listening on it.
#[cfg(test)]
pub(crate) fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
