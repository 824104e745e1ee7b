use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::*;
use crate::AppState;

use super::{created, ApiError};

/// List all elements
pub async fn list_elements(State(state): State<Arc<AppState>>) -> Json<ElementList> {
    Json(ElementList {
        elements: state.store.list().await,
    })
}

/// Bulk upsert elements; the last occurrence of a repeated id wins
pub async fn upload_elements(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<Vec<Element>>,
) -> Result<(StatusCode, Json<BTreeMap<String, String>>), ApiError> {
    let paths = state.store.bulk_upsert(batch).await?;
    tracing::info!("Uploaded {} elements", paths.len());
    Ok(created(paths))
}

/// Delete all elements
pub async fn clear_elements(State(state): State<Arc<AppState>>) -> Json<ElementList> {
    state.store.clear().await;
    Json(ElementList::default())
}

/// Create a single element; 400 if the id already exists
pub async fn create_element(
    State(state): State<Arc<AppState>>,
    Json(element): Json<Element>,
) -> Result<(StatusCode, Json<BTreeMap<String, String>>), ApiError> {
    let id = element.id.clone();
    let elem_type = element.elem_type();
    let path = state.store.create(element).await?;
    tracing::debug!("Created {} '{}'", elem_type, id);
    Ok(created(BTreeMap::from([(id, path)])))
}

/// Get a single element by ID
pub async fn get_element(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Element>, ApiError> {
    let element = state.store.get(&id).await?;
    Ok(Json(element))
}

/// Replace an existing element in full
pub async fn update_element(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(element): Json<Element>,
) -> Result<Json<ElementUpdate>, ApiError> {
    if element.id != id {
        return Err(ApiError::bad_request(format!(
            "element id '{}' does not match path id '{}'",
            element.id, id
        )));
    }

    let orig_element = state.store.replace(element.clone()).await?;
    Ok(Json(ElementUpdate {
        orig_element,
        new_element: element,
    }))
}

/// Delete a single element, returning it
pub async fn delete_element(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Element>, ApiError> {
    let removed = state.store.delete(&id).await?;
    tracing::debug!("Deleted {} '{}'", removed.elem_type(), id);
    Ok(Json(removed))
}
