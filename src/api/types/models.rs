//! Wire types for the calculator endpoints

use serde::{Deserialize, Serialize};

use crate::domain::forms::FieldDescriptor;
use crate::domain::render::plot_choices;
use crate::domain::session::{ErrorLog, SessionData};

/// One entry of the plot-quantity selector.
#[derive(Debug, Clone, Serialize)]
pub struct PlotChoice {
    pub value: String,
    pub label: String,
}

/// The session's model collection as shown to the client.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// Model labels, in creation order.
    pub models: Vec<String>,
    /// Quantities currently offered for plotting, comparisons included when
    /// the stored models' mass grids line up.
    pub plot_choices: Vec<PlotChoice>,
    /// Accumulated render failures, per label and message.
    pub errors: ErrorLog,
}

impl SessionResponse {
    pub fn from_session(data: &SessionData) -> Self {
        Self {
            models: data.labels(),
            plot_choices: plot_choices(&data.models)
                .into_iter()
                .map(|(value, label)| PlotChoice { value, label })
                .collect(),
            errors: data.error_log.clone(),
        }
    }
}

/// The composite configuration form, ready for client-side rendering.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub fields: Vec<FieldDescriptor>,
}

/// A problem-report submission.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub bad_labels: Vec<String>,
    #[serde(default)]
    pub bad_quantities: Vec<String>,
}
