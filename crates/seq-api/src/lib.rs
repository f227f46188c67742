//! Read-only HTTP-style introspection for sequenced executors.
//!
//! [`JsonGetHandler`] is the transport-neutral GET contract; [`StatsHandler`] implements it
//! over an [`ExecutorDirectory`] so any HTTP server can expose executor stats as JSON.

mod error;
pub use error::ApiError;

mod response;
pub use response::Response;

mod handler;
pub use handler::{AuthContext, JsonGetHandler, Params};

mod directory;
pub use directory::ExecutorDirectory;

mod stats;
pub use stats::{STATS_PATH, StatsHandler};

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;
