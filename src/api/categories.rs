//! Category Routes
//!
//! Routes:
//! - GET /categories - List all categories
//! - POST /categories - Create a category (multipart or url-encoded form)

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::multipart_error;
use crate::models::Category;
use crate::{AppState, Error, Result};

/// Build category routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories).post(create_category))
}

#[derive(Debug, Deserialize)]
struct CategoryForm {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateCategoryResponse {
    pub message: String,
    #[serde(flatten)]
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<Category>,
}

/// List all categories.
///
/// GET /categories
#[axum::debug_handler]
async fn list_categories(State(state): State<AppState>) -> Result<Json<ListCategoriesResponse>> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(ListCategoriesResponse { categories }))
}

/// Create a category.
///
/// POST /categories
///
/// Duplicate names are accepted and create a new category each time.
#[axum::debug_handler]
async fn create_category(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<CreateCategoryResponse>> {
    let name = read_name(request, &state).await?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Category name is required".into()));
    }

    let category = state.catalog.add_category(name).await?;
    tracing::info!(id = category.id, name = %category.name, "Category created");

    Ok(Json(CreateCategoryResponse {
        message: format!("category received: {}", category.name),
        category,
    }))
}

/// Read the `name` field from either a multipart or a url-encoded form.
async fn read_name(request: Request, state: &AppState) -> Result<String> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if !is_multipart {
        let Form(form) = Form::<CategoryForm>::from_request(request, state)
            .await
            .map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    Error::FileTooLarge {
                        max_size: state.upload_limit,
                    }
                } else {
                    Error::InvalidInput(e.body_text())
                }
            })?;
        return Ok(form.name);
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| Error::InvalidInput(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, state.upload_limit))?
    {
        if field.name() == Some("name") {
            return field
                .text()
                .await
                .map_err(|e| multipart_error(e, state.upload_limit));
        }
    }

    Ok(String::new())
}
