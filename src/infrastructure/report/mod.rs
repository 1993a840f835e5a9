//! Problem-report delivery.
//!
//! Reports are written to the structured log at warn level so operators see
//! them without a mail server in the loop; an in-memory sink backs the tests.

use std::sync::RwLock;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{DomainError, ProblemReport, ReportSink};

/// Emits each report into the structured log.
pub struct LogReportSink;

impl LogReportSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogReportSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportSink for LogReportSink {
    async fn submit(&self, report: ProblemReport) -> Result<(), DomainError> {
        let body = serde_json::to_string(&report)
            .map_err(|e| DomainError::internal(format!("serializing problem report: {e}")))?;
        warn!(
            from = %report.email,
            labels = ?report.bad_labels,
            quantities = ?report.bad_quantities,
            report = %body,
            "problem report submitted"
        );
        Ok(())
    }
}

/// Collects reports in memory.
pub struct InMemoryReportSink {
    reports: RwLock<Vec<ProblemReport>>,
}

impl InMemoryReportSink {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(Vec::new()),
        }
    }

    pub fn reports(&self) -> Result<Vec<ProblemReport>, DomainError> {
        Ok(self
            .reports
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?
            .clone())
    }
}

impl Default for InMemoryReportSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportSink for InMemoryReportSink {
    async fn submit(&self, report: ProblemReport) -> Result<(), DomainError> {
        self.reports
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?
            .push(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report() -> ProblemReport {
        ProblemReport {
            name: "A User".to_string(),
            email: "user@example.com".to_string(),
            message: "the mass function looks off".to_string(),
            bad_labels: vec!["default".to_string()],
            bad_quantities: vec!["dndm".to_string()],
            model_parameters: vec![],
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_sink_collects() {
        let sink = InMemoryReportSink::new();
        sink.submit(report()).await.unwrap();
        assert_eq!(sink.reports().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_log_sink_accepts() {
        let sink = LogReportSink::new();
        assert!(sink.submit(report()).await.is_ok());
    }
}
