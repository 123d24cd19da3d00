//! Upstream todo API subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → client.rs (GET {base_url}/todos[/{id}])
//!     → UpstreamResponse (status + raw body)
//!     → handler decides: passthrough, 404, or UpstreamError
//! ```

pub mod client;
pub mod types;

pub use client::{TodoClient, UpstreamResponse};
pub use types::{UpstreamError, UpstreamResult};
