//! clamp-tools: bounded API tools (credentials, parameter binding, output
//! bounding, tool façade, toolkits).

pub mod bounding;
pub mod config;
pub mod credentials;
mod error;
mod external;
pub mod facade;
pub mod figma;
pub mod params;
mod path;
pub mod registry;
pub mod toolkit;
pub mod traits;

pub use bounding::{bound, bound_as, BoundedResult};
pub use config::{ToolConfig, ToolSettings};
pub use credentials::{resolve_credential, CredentialKind, TokenScheme};
pub use error::ToolError;
pub use external::{build_http_tool, register_http_tools, HttpToolConfig};
pub use facade::{BoundedTool, Endpoint};
pub use params::{bind, CallParams, EffectiveParams, FilterPattern, LimitValue, DEFAULT_LIMIT};
pub use registry::{ToolDefinition, ToolRegistry};
pub use toolkit::Toolkit;
pub use traits::{Tool, ToolContext, ToolResult, CUSTOM_KIND};
