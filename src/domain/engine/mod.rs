//! Interface boundary to the external halo-model numerical library.
//!
//! The actual mass-function, power-spectrum and correlation-function
//! computations live behind these traits; this crate only drives
//! construction, cloning and derived-quantity reads.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::framework::FrameworkConfig;
use crate::domain::DomainError;

/// Construction class family of a model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelClass {
    /// The plain tracer halo model.
    Tracer,
    /// The warm-dark-matter variant.
    TracerWdm,
}

/// Independent-variable grid of a derived quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// Halo mass.
    M,
    /// Wavenumber.
    K,
    /// Physical scale.
    R,
    /// Halo-model wavenumber grid.
    KHm,
}

impl AxisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "m",
            Self::K => "k",
            Self::R => "r",
            Self::KHm => "k_hm",
        }
    }

    pub fn xlabel(&self) -> &'static str {
        match self {
            Self::M => "Mass (Msun/h)",
            Self::K => "Wavenumber, k [h/Mpc]",
            Self::R => "Scale, r [Mpc/h]",
            Self::KHm => "Fourier Scale, k [h/Mpc]",
        }
    }

    pub const ALL: [AxisKind; 4] = [Self::M, Self::K, Self::R, Self::KHm];
}

/// One constructed model instance with lazily computed, cached derived
/// quantities.
pub trait ModelInstance: Send + Sync {
    fn class(&self) -> ModelClass;

    /// The independent-variable grid for one axis.
    fn grid(&self, axis: AxisKind) -> Result<Vec<f64>, DomainError>;

    /// A named derived quantity; `Ok(None)` when the quantity is not
    /// computable under the current configuration.
    fn quantity(&self, name: &str) -> Result<Option<Vec<f64>>, DomainError>;

    /// Current variant name of one component (e.g. `bias` -> `Tinker10`),
    /// `None` when the component is unset.
    fn component_model(&self, kind: &str) -> Option<String>;

    /// Ordered `(name, value)` pairs of every effective parameter, for
    /// serialization and export.
    fn parameter_values(&self) -> Vec<(String, String)>;

    /// Clone this instance with `updates` applied, sharing cached derived
    /// quantities that the update does not affect. Scalar keys overwrite;
    /// a `{kind}_params` map present in the update replaces the component's
    /// parameter set wholesale.
    fn clone_with(&self, updates: &FrameworkConfig) -> Result<Arc<dyn ModelInstance>, DomainError>;
}

/// Constructor for model instances.
pub trait HaloEngine: Send + Sync {
    fn construct(
        &self,
        class: ModelClass,
        config: &FrameworkConfig,
    ) -> Result<Arc<dyn ModelInstance>, DomainError>;
}
