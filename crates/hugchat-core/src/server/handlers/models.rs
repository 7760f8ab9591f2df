use axum::{extract::State, http::HeaderMap, Json};
use hugchat_types::protocol::{ModelEntry, ModelList};

use super::{identity, open_session};
use crate::error::GatewayResult;
use crate::server::AppState;

/// `GET /v1/models`: every remote model, listed or not.
pub async fn handle_list_models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> GatewayResult<Json<ModelList>> {
    let session = open_session(&state, identity(&headers)?).await?;
    let models = session.list_models().await?;
    tracing::info!("[Server] Listing {} model(s)", models.len());
    Ok(Json(ModelList::new(models.into_iter().map(|m| ModelEntry::new(m.id)).collect())))
}
