//! Problem-report boundary.
//!
//! Users can flag model/quantity combinations that look wrong; the report
//! captures the full serialized parameters of every stored model so the issue
//! can be reproduced offline. Delivery (e-mail or otherwise) is a collaborator
//! behind [`ReportSink`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DomainError;

/// One submitted problem report.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemReport {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Labels the user flagged as misbehaving.
    pub bad_labels: Vec<String>,
    /// Quantities the user flagged as misbehaving.
    pub bad_quantities: Vec<String>,
    /// Serialized `parameter_values` of every stored model at submission time.
    pub model_parameters: Vec<(String, Vec<(String, String)>)>,
    pub submitted_at: DateTime<Utc>,
}

#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn submit(&self, report: ProblemReport) -> Result<(), DomainError>;
}
