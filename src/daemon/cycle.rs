use crate::api::{Authenticator, DataFetcher};
use crate::core::credentials::CredentialSource;
use crate::core::error::CycleError;
use crate::core::models::CycleOutcome;
use crate::daemon::polling::Cycle;
use crate::daemon::sink::OutcomeSink;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// One login followed by one fetch. Nothing carries over between cycles.
pub struct PollCycle {
    authenticator: Authenticator,
    fetcher: DataFetcher,
    credentials: Arc<dyn CredentialSource>,
    sink: Arc<dyn OutcomeSink>,
}

impl PollCycle {
    pub fn new(
        authenticator: Authenticator,
        fetcher: DataFetcher,
        credentials: Arc<dyn CredentialSource>,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            authenticator,
            fetcher,
            credentials,
            sink,
        }
    }

    async fn authenticated_fetch(&self) -> Result<Vec<u8>, CycleError> {
        let credentials = self.credentials.credentials();
        let login = self.authenticator.login(&credentials).await?;
        let payload = self.fetcher.fetch_protected_resource(&login.token).await?;
        Ok(payload)
    }
}

#[async_trait]
impl Cycle for PollCycle {
    async fn run_cycle(&self) -> CycleOutcome {
        let started_at = Utc::now();
        let start = Instant::now();
        self.sink.cycle_started(started_at);

        let result = self.authenticated_fetch().await;
        let outcome = CycleOutcome {
            started_at,
            elapsed: start.elapsed(),
            result,
        };

        let elapsed_ms = outcome.elapsed.as_millis() as u64;
        match &outcome.result {
            Ok(payload) => {
                tracing::info!(elapsed_ms, bytes = payload.len(), "Cycle succeeded");
            }
            Err(e) => {
                tracing::warn!(elapsed_ms, stage = e.stage(), error = %e, "Cycle failed");
            }
        }

        self.sink.emit(&outcome);
        outcome
    }
}
