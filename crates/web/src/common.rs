use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use map_markers::RequestError;
use model::{api::Envelope, ExampleData};
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Public message for markers that do not exist and markers of other sessions.
/// Both read the same, so a session can not discover foreign ids.
pub const INACCESSIBLE_MARKER: &str = "marker not found or session mismatch";

pub fn success<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope::ok(data)))
}

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    ApiError::new(StatusCode::NOT_FOUND)
        .with_method(req.method())
        .with_uri(original_uri.path())
        .with_default_message()
}

pub(crate) async fn method_not_allowed(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED)
        .with_method(req.method())
        .with_uri(original_uri.path())
        .with_message("Method not allowed")
}

// - Failure responses -

/// A failed API call. Rendered as `{"success": false, "error": ...}` with
/// status 200; the status code is kept for logging only, callers have to look
/// at `success`.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status_code: StatusCode,
    pub http_method: Option<String>,
    pub requested_uri: Option<String>,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
        }
    }

    /// Wraps a service error, prefixing the message with what was attempted,
    /// e.g. "Failed to save marker".
    pub fn request(context: &str, why: RequestError) -> Self {
        let (status_code, reason) = match &why {
            RequestError::NotFound | RequestError::SessionMismatch => {
                log::warn!("{}: {}", context, why);
                (StatusCode::NOT_FOUND, INACCESSIBLE_MARKER.to_owned())
            }
            RequestError::InvalidSessionHash(_) | RequestError::InvalidInput(_) => {
                log::warn!("{}: {}", context, why);
                (StatusCode::BAD_REQUEST, why.to_string())
            }
            RequestError::SessionHash(_) | RequestError::Other(_) => {
                log::error!("{}: {}", context, why);
                (StatusCode::INTERNAL_SERVER_ERROR, why.to_string())
            }
        };
        Self::new(status_code).with_message(format!("{}: {}", context, reason))
    }

    pub fn json_rejection(context: &str, why: JsonRejection) -> Self {
        log::warn!("{}: {}", context, why.body_text());
        Self::new(why.status()).with_message(format!("{}: {}", context, why.body_text()))
    }

    pub fn query_rejection(context: &str, why: QueryRejection) -> Self {
        log::warn!("{}: {}", context, why.body_text());
        Self::new(why.status()).with_message(format!("{}: {}", context, why.body_text()))
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }

    fn error_text(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown error");
        match (&self.http_method, &self.requested_uri) {
            (Some(method), Some(uri)) => format!("{} ({} {})", message, method, uri),
            _ => message.to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(Envelope::<()>::failure(self.error_text()))).into_response()
    }
}
