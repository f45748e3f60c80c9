pub mod health;
pub mod workflows;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /workflows                       list, create (GET, POST)
/// /workflows/{id}                  get, update, delete (GET, PUT, DELETE)
/// /workflows/{id}/execute          run the workflow (POST)
///
/// /workflow-feedback               submit feedback on the last run (POST)
///
/// /objects/{id}                    dereference a result object (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/workflows", workflows::router())
        .route("/workflow-feedback", post(handlers::feedback::submit_feedback))
        .route("/objects/{id}", get(handlers::objects::get_object))
}
