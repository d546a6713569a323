use axum::extract::State;
use map_markers::database::Database;
use model::api::SessionHashPayload;

use crate::{
    common::{success, ApiError, ApiResult},
    WebState,
};

pub(crate) async fn generate_session_hash<D: Database + 'static>(
    State(WebState { marker_client }): State<WebState<D>>,
) -> ApiResult<SessionHashPayload> {
    let session_hash = marker_client
        .generate_session_hash()
        .map_err(|why| ApiError::request("Failed to generate session hash", why))?;
    log::info!("minted a new session hash");
    success(SessionHashPayload { session_hash })
}
