//! Image Routes
//!
//! Routes:
//! - GET /image/:image_filename - Download an image by its stored name
//!
//! Missing images are replaced by the default image rather than reported.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{AppState, Result};

/// Build image routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/image/:image_filename", get(get_image))
}

/// Download an image.
///
/// GET /image/:image_filename
#[axum::debug_handler]
async fn get_image(
    State(state): State<AppState>,
    Path(image_filename): Path<String>,
) -> Result<Response> {
    let image = state.images.load(&image_filename).await?;
    tracing::debug!(
        path = %image.path.display(),
        is_default = image.is_default,
        "Serving image"
    );

    Ok((
        [(header::CONTENT_TYPE, image.content_type)],
        image.data,
    )
        .into_response())
}
