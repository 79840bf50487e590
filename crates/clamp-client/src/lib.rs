//! clamp-client: raw response sources for third-party web APIs.

mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::UpstreamError;
pub use http::{HttpSource, HttpSourceConfig};
pub use traits::ResponseSource;
pub use types::{ApiRequest, AuthHeader, Method, PayloadFormat, RawResponse};
