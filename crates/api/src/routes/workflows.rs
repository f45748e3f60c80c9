//! Route definitions for the workflow template catalogue.
//!
//! Mounted at `/workflows`:
//!
//! ```text
//! GET    /                  list_workflows
//! POST   /                  create_workflow
//! GET    /{id}              get_workflow
//! PUT    /{id}              update_workflow
//! DELETE /{id}              delete_workflow
//! POST   /{id}/execute      execute_workflow
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{execute, workflows};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workflows::list_workflows).post(workflows::create_workflow),
        )
        .route(
            "/{id}",
            get(workflows::get_workflow)
                .put(workflows::update_workflow)
                .delete(workflows::delete_workflow),
        )
        .route("/{id}/execute", post(execute::execute_workflow))
}
