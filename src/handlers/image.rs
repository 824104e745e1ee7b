use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::AppState;

use super::ApiError;

/// Serve the current topology visualization as PNG or JPEG
pub async fn get_image(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let elements = state.store.list().await;
    let image = state.visualizer.render(&elements).await?;
    tracing::debug!(
        "Serving {} byte {} visualization of {} elements",
        image.bytes.len(),
        image.format.content_type(),
        elements.len()
    );
    Ok(([(header::CONTENT_TYPE, image.format.content_type())], image.bytes).into_response())
}
