//! Item Routes
//!
//! Listing upload and retrieval.
//!
//! Routes:
//! - GET /items - List all items
//! - POST /items - Upload an item (multipart form)
//! - GET /items/:id - Get a single item

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::multipart_error;
use crate::models::Item;
use crate::services::{CategoryRef, NewListing};
use crate::{AppState, Error, Result};

/// Build item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item))
}

// ============================================================================
// Response Types
// ============================================================================

/// Acknowledgement for an uploaded item.
#[derive(Debug, Serialize)]
pub struct CreateItemResponse {
    pub message: String,
    #[serde(flatten)]
    pub item: Item,
}

#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<Item>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all items.
///
/// GET /items
#[axum::debug_handler]
async fn list_items(State(state): State<AppState>) -> Result<Json<ListItemsResponse>> {
    let items = state.catalog.list_items().await?;
    Ok(Json(ListItemsResponse { items }))
}

/// Upload an item.
///
/// POST /items
///
/// Accepts multipart/form-data with text fields `name` and either
/// `category` (free text) or `category_id` (an existing category), and a
/// file field `image`. `category_id` wins when both are sent.
#[axum::debug_handler]
async fn create_item(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<CreateItemResponse>> {
    let mut multipart = multipart.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let limit = state.upload_limit;

    let mut name = String::new();
    let mut category = None;
    let mut category_id = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "name" => name = field.text().await.map_err(|e| multipart_error(e, limit))?,
            "category" => {
                category = Some(field.text().await.map_err(|e| multipart_error(e, limit))?)
            }
            "category_id" => {
                category_id = Some(field.text().await.map_err(|e| multipart_error(e, limit))?)
            }
            "image" => {
                // A plain text part named `image` is not a file upload
                if field.file_name().is_none() {
                    tracing::debug!("Ignoring image field without a filename");
                    continue;
                }
                let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                image = Some(data.to_vec());
            }
            _ => continue,
        }
    }

    let image = image.ok_or_else(|| Error::InvalidInput("Image file is required".into()))?;
    let category = parse_category(category, category_id)?;

    let item = state
        .listings
        .create(NewListing {
            name,
            category,
            image,
        })
        .await?;

    Ok(Json(CreateItemResponse {
        message: format!("item received: {}", item.name),
        item,
    }))
}

/// Get a single item.
///
/// GET /items/:id
#[axum::debug_handler]
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput("Invalid ID format".into()))?;

    state
        .catalog
        .get_item(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound("Item not found".into()))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Decide how the upload names its category.
fn parse_category(category: Option<String>, category_id: Option<String>) -> Result<CategoryRef> {
    match category_id {
        Some(raw) => raw
            .trim()
            .parse()
            .map(CategoryRef::Id)
            .map_err(|_| Error::InvalidInput(format!("Invalid category_id: {:?}", raw))),
        None => Ok(CategoryRef::Name(category.unwrap_or_default())),
    }
}
