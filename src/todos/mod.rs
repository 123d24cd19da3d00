//! Todo route handlers.

pub mod handlers;

pub use handlers::{get_todo, list_todos};
