//! Handlers for the two proxied routes.
//!
//! Handlers annotate the request span, call upstream and shape the response.
//! Errors are returned to the dispatcher; only upstream 404 on the detail
//! route is turned into a response here.

use axum::{http::StatusCode, response::Response};
use opentelemetry::KeyValue;

use crate::http::response;
use crate::observability::tracing::{RequestSpan, APP_TODO_COUNT, APP_TODO_ID, HTTP_ROUTE};
use crate::routing::Router;
use crate::upstream::{TodoClient, UpstreamResult};

/// `GET /` - the full todo list.
pub async fn list_todos(client: &TodoClient, span: &mut RequestSpan) -> UpstreamResult<Response> {
    span.update_name("GET /");
    span.set_attribute(KeyValue::new(HTTP_ROUTE, Router::LIST_TEMPLATE));

    let todos = client
        .list_todos(span.trace_headers())
        .await?
        .error_for_status()?
        .json_array()?;

    span.set_attribute(KeyValue::new(APP_TODO_COUNT, todos.len() as i64));

    Ok(response::json(todos))
}

/// `GET /todos/:id` - a single todo, `id` forwarded untouched.
pub async fn get_todo(
    client: &TodoClient,
    id: &str,
    span: &mut RequestSpan,
) -> UpstreamResult<Response> {
    span.update_name("GET /todos/:id");
    span.set_attribute(KeyValue::new(HTTP_ROUTE, Router::DETAIL_TEMPLATE));
    span.set_attribute(KeyValue::new(APP_TODO_ID, id.to_string()));

    let upstream = client.get_todo(id, span.trace_headers()).await?;

    if upstream.status() == StatusCode::NOT_FOUND {
        tracing::debug!(id = %id, "Todo not found upstream");
        return Ok(response::todo_not_found());
    }

    let todo = upstream.error_for_status()?.json()?;
    Ok(response::json(todo))
}
