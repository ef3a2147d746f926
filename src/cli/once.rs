use crate::core::credentials::{CredentialSource, EnvCredentials};
use crate::core::settings::Settings;
use crate::daemon::{self, Cycle, OutcomeSink, OutputFormat, StdoutSink};
use anyhow::Result;
use std::sync::Arc;

/// Runs a single cycle and fails if it did.
pub async fn run(settings: &Settings, format: OutputFormat) -> Result<()> {
    let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredentials);
    daemon::warn_on_missing_credentials(credentials.as_ref());

    let sink: Arc<dyn OutcomeSink> = Arc::new(StdoutSink::new(format));
    let cycle = daemon::build_poll_cycle(settings, credentials, sink)?;

    let outcome = cycle.run_cycle().await;
    if let Err(e) = outcome.result {
        anyhow::bail!("Cycle failed during {}: {}", e.stage(), e);
    }

    Ok(())
}
