//! clamp-core: configuration and tool registry assembly.

pub mod config;
mod error;
pub mod registry;

pub use config::{Config, ConfigStore, ToolkitConfig, ToolkitKind};
pub use error::CoreError;
pub use registry::{build_registry, build_toolkit};
