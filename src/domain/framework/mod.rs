//! Framework configuration: the nested config mapping, the form-to-config
//! mapper, and the construction/clone driver.

pub mod config;
pub mod driver;
pub mod mapper;

pub use config::{ConfigValue, FrameworkConfig};
pub use driver::drive;
pub use mapper::map;
