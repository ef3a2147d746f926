use crate::core::models::CycleOutcome;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Receives the outcome of every cycle.
pub trait OutcomeSink: Send + Sync {
    fn cycle_started(&self, at: DateTime<Utc>);
    fn emit(&self, outcome: &CycleOutcome);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    started_at: DateTime<Utc>,
    elapsed_ms: u128,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl OutputFormat {
    /// Line printed when a cycle begins. JSON output has none.
    pub fn render_start(&self, at: DateTime<Utc>) -> Option<String> {
        match self {
            OutputFormat::Text => Some(format!(
                "Polling customers at: {}",
                at.with_timezone(&Local).to_rfc2822()
            )),
            OutputFormat::Json => None,
        }
    }

    pub fn render(&self, outcome: &CycleOutcome) -> String {
        match self {
            OutputFormat::Text => match &outcome.result {
                Ok(payload) => format!("customers: {}", String::from_utf8_lossy(payload)),
                Err(e) => format!("Error: {}", e),
            },
            OutputFormat::Json => {
                let record = OutcomeRecord {
                    started_at: outcome.started_at,
                    elapsed_ms: outcome.elapsed.as_millis(),
                    status: if outcome.is_success() { "ok" } else { "error" },
                    payload: outcome.payload_text(),
                    stage: outcome.result.as_ref().err().map(|e| e.stage()),
                    error: outcome.result.as_ref().err().map(|e| e.to_string()),
                };
                serde_json::to_string(&record).unwrap_or_else(|e| {
                    format!(r#"{{"status":"error","error":"unserializable outcome: {}"}}"#, e)
                })
            }
        }
    }
}

/// Writes one line per event to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    format: OutputFormat,
}

impl StdoutSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutcomeSink for StdoutSink {
    fn cycle_started(&self, at: DateTime<Utc>) {
        if let Some(line) = self.format.render_start(at) {
            println!("{}", line);
        }
    }

    fn emit(&self, outcome: &CycleOutcome) {
        println!("{}", self.format.render(outcome));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Collects rendered text lines in memory.
    #[derive(Default)]
    pub struct MemorySink {
        lines: Mutex<Vec<String>>,
    }

    impl MemorySink {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl OutcomeSink for MemorySink {
        fn cycle_started(&self, at: DateTime<Utc>) {
            if let Some(line) = OutputFormat::Text.render_start(at) {
                self.lines.lock().unwrap().push(line);
            }
        }

        fn emit(&self, outcome: &CycleOutcome) {
            self.lines
                .lock()
                .unwrap()
                .push(OutputFormat::Text.render(outcome));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{CycleError, FetchError};
    use reqwest::StatusCode;
    use std::time::Duration;

    fn success() -> CycleOutcome {
        CycleOutcome {
            started_at: Utc::now(),
            elapsed: Duration::from_millis(42),
            result: Ok(br#"[{"id":1}]"#.to_vec()),
        }
    }

    fn failure() -> CycleOutcome {
        CycleOutcome {
            started_at: Utc::now(),
            elapsed: Duration::from_millis(7),
            result: Err(CycleError::Fetch(FetchError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "server error".to_string(),
            })),
        }
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(OutputFormat::Text.render(&success()), r#"customers: [{"id":1}]"#);

        let line = OutputFormat::Text.render(&failure());
        assert!(line.starts_with("Error: "));
        assert!(line.contains("server error"));
    }

    #[test]
    fn test_start_line_is_timestamped() {
        let at = Utc::now();
        let line = OutputFormat::Text.render_start(at).unwrap();
        let stamp = line.strip_prefix("Polling customers at: ").unwrap();

        let parsed = DateTime::parse_from_rfc2822(stamp).unwrap();
        assert_eq!(parsed.timestamp(), at.timestamp());
        assert!(OutputFormat::Json.render_start(Utc::now()).is_none());
    }

    #[test]
    fn test_json_rendering() {
        let ok: serde_json::Value =
            serde_json::from_str(&OutputFormat::Json.render(&success())).unwrap();
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["elapsed_ms"], 42);
        assert_eq!(ok["payload"], r#"[{"id":1}]"#);
        assert!(ok.get("error").is_none());

        let err: serde_json::Value =
            serde_json::from_str(&OutputFormat::Json.render(&failure())).unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["stage"], "fetch");
        assert!(err["error"].as_str().unwrap().contains("server error"));
        assert!(err.get("payload").is_none());
    }
}
