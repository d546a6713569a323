use std::{error, fmt};

use async_trait::async_trait;
use model::{
    api::{
        AttachImage, DeleteMarker, DeletedPayload, Envelope, ImagePayload,
        MapPositionPayload, MarkerList, MarkerPayload, MarkersQuery, NewMarker,
        RemoveImage, SaveMapPosition, SessionHashPayload, UpdateMarker,
    },
    image::Image,
    map_position::MapPosition,
    marker::Marker,
    session::SessionHash,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::FrontendConfig;

#[derive(Debug)]
pub enum FetchError {
    /// The server could not be reached or answered with something unreadable.
    Transport(reqwest::Error),
    /// The server answered with `success: false`.
    Server(String),
    /// The server reported success but the payload did not fit.
    Decode(serde_json::Error),
}

impl error::Error for FetchError {}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request failed: {}", e),
            FetchError::Server(message) => f.write_str(message),
            FetchError::Decode(e) => write!(f, "unexpected response: {}", e),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Unwraps a response body. The payload is only decoded once `success` says
/// there is one, so a malformed payload is told apart from a failed call.
fn read_envelope<T: DeserializeOwned>(envelope: Envelope<Value>) -> FetchResult<T> {
    if !envelope.success {
        let message = envelope
            .error
            .unwrap_or_else(|| "unknown server error".to_owned());
        return Err(FetchError::Server(message));
    }
    let data = envelope.data.unwrap_or_else(|| Value::Object(Default::default()));
    Ok(serde_json::from_value(data)?)
}

/// The server's marker API as seen from the client.
#[async_trait]
pub trait MarkerApi: Send + Sync {
    async fn generate_session_hash(&self) -> FetchResult<SessionHash>;
    async fn list_markers(&self, session_hash: &SessionHash) -> FetchResult<MarkerList>;
    async fn create_marker(&self, new_marker: NewMarker) -> FetchResult<Marker>;
    async fn update_marker(&self, update: UpdateMarker) -> FetchResult<Marker>;
    async fn delete_marker(&self, delete: DeleteMarker) -> FetchResult<i32>;
    async fn save_map_position(&self, position: SaveMapPosition) -> FetchResult<MapPosition>;
    async fn attach_image(&self, attach: AttachImage) -> FetchResult<Image>;
    async fn remove_image(&self, remove: RemoveImage) -> FetchResult<i32>;
}

/// [`MarkerApi`] talking JSON to the web server.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_config(config: &FrontendConfig) -> Self {
        Self::new(config.api_base_url.as_str())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> FetchResult<T> {
        let envelope: Envelope<Value> = request.send().await?.json().await?;
        read_envelope(envelope)
    }

    async fn markers<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        body: &B,
    ) -> FetchResult<T> {
        self.fetch(self.client.request(method, self.url("markers")).json(body))
            .await
    }
}

#[async_trait]
impl MarkerApi for HttpApi {
    async fn generate_session_hash(&self) -> FetchResult<SessionHash> {
        let payload: SessionHashPayload = self
            .fetch(self.client.get(self.url("generate-session-hash")))
            .await?;
        Ok(payload.session_hash)
    }

    async fn list_markers(&self, session_hash: &SessionHash) -> FetchResult<MarkerList> {
        let query = MarkersQuery {
            session_hash: session_hash.to_string(),
        };
        self.fetch(self.client.get(self.url("markers")).query(&query))
            .await
    }

    async fn create_marker(&self, new_marker: NewMarker) -> FetchResult<Marker> {
        let payload: MarkerPayload = self.markers(reqwest::Method::POST, &new_marker).await?;
        Ok(payload.marker)
    }

    async fn update_marker(&self, update: UpdateMarker) -> FetchResult<Marker> {
        let payload: MarkerPayload = self.markers(reqwest::Method::PUT, &update).await?;
        Ok(payload.marker)
    }

    async fn delete_marker(&self, delete: DeleteMarker) -> FetchResult<i32> {
        let payload: DeletedPayload = self.markers(reqwest::Method::DELETE, &delete).await?;
        Ok(payload.id)
    }

    async fn save_map_position(&self, position: SaveMapPosition) -> FetchResult<MapPosition> {
        let payload: MapPositionPayload =
            self.markers(reqwest::Method::POST, &position).await?;
        Ok(payload.map_position)
    }

    async fn attach_image(&self, attach: AttachImage) -> FetchResult<Image> {
        let payload: ImagePayload = self.markers(reqwest::Method::POST, &attach).await?;
        Ok(payload.image)
    }

    async fn remove_image(&self, remove: RemoveImage) -> FetchResult<i32> {
        let payload: DeletedPayload = self.markers(reqwest::Method::DELETE, &remove).await?;
        Ok(payload.id)
    }
}
