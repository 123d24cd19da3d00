//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (dot-segment resolution, ordered route lookup)
//!     → matcher.rs (evaluate path template, capture params)
//!     → Return: matched Route or None
//!
//! Route Compilation (at startup):
//!     "/" and "/todos/:id"
//!     → compiled into RoutePattern segments
//!     → frozen as an immutable Router shared via Arc
//! ```

pub mod matcher;
pub mod router;

pub use matcher::{PathParams, RoutePattern};
pub use router::{Route, Router};
