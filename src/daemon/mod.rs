mod cycle;
mod polling;
mod sink;

use crate::api::{build_http_client, Authenticator, DataFetcher};
use crate::core::credentials::{CredentialSource, EnvCredentials};
use crate::core::error::ConfigError;
use crate::core::settings::Settings;
use anyhow::Result;
use std::sync::Arc;

pub use cycle::PollCycle;
pub use polling::{Cycle, Scheduler};
pub use sink::{OutcomeSink, OutputFormat, StdoutSink};

/// Wires the shared HTTP client, both endpoints, and the sink into a cycle.
pub fn build_poll_cycle(
    settings: &Settings,
    credentials: Arc<dyn CredentialSource>,
    sink: Arc<dyn OutcomeSink>,
) -> Result<PollCycle, ConfigError> {
    let client = build_http_client(&settings.api).map_err(ConfigError::HttpClient)?;
    let authenticator = Authenticator::new(client.clone(), settings.api.login_url()?);
    let fetcher = DataFetcher::new(client, settings.api.resource_url()?);

    Ok(PollCycle::new(authenticator, fetcher, credentials, sink))
}

pub fn warn_on_missing_credentials(source: &dyn CredentialSource) {
    let missing = source.credentials().missing_fields();
    if !missing.is_empty() {
        tracing::warn!(
            ?missing,
            "Credentials not set; login requests will be sent with empty values"
        );
    }
}

pub async fn run(settings: &Settings, format: OutputFormat) -> Result<()> {
    tracing::info!(
        login_url = %settings.api.login_url()?,
        resource_url = %settings.api.resource_url()?,
        "Starting traxmate-poller daemon"
    );

    let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredentials);
    warn_on_missing_credentials(credentials.as_ref());

    let sink: Arc<dyn OutcomeSink> = Arc::new(StdoutSink::new(format));
    let cycle = build_poll_cycle(settings, credentials, sink)?;

    Scheduler::new(cycle, &settings.polling).run().await;
    Ok(())
}
