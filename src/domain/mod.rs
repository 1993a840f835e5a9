//! Domain layer - schema registry, form composition, configuration mapping
//! and the session-scoped model collection.

pub mod engine;
pub mod error;
pub mod forms;
pub mod framework;
pub mod render;
pub mod report;
pub mod schema;
pub mod session;

pub use engine::{AxisKind, HaloEngine, ModelClass, ModelInstance};
pub use error::DomainError;
pub use forms::{build_form, clean, CleanedForm, FieldDescriptor, FormErrors, RawFields};
pub use framework::{drive, map, ConfigValue, FrameworkConfig};
pub use render::{collect_series, plot_choices, PlotFormat, PlotRenderer, Series};
pub use report::{ProblemReport, ReportSink};
pub use schema::{registry, ComponentSchema, SchemaRegistry, VariantParameterSpec};
pub use session::{ErrorLog, SessionData, SessionId, SessionRepository, StoredModel};
