//! Handler for dereferencing result objects.
//!
//! Binary workflow results (images, PDFs, downloads) are parked in the
//! process-local object store and addressed by URLs under
//! `/api/v1/objects/{id}`. An object lives until its run is superseded or
//! discarded, after which this endpoint returns 404.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /objects/{id}
// ---------------------------------------------------------------------------

/// Serve a parked result object with its original content type.
pub async fn get_object(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let object = state.objects.fetch(id).ok_or_else(|| {
        AppError::Core(flowdesk_core::error::CoreError::NotFound {
            entity: "Object",
            id,
        })
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, object.content_type)],
        object.bytes,
    ))
}
