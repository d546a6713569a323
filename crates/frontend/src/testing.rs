//! Test doubles for the page and the server. Every double is a cheap handle
//! onto shared state, so a test keeps one clone for inspection.

use std::{
    collections::HashMap,
    error::Error,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use map_markers::{client::Client, memory::MemoryDatabase, RequestError};
use model::{
    api::{
        AttachImage, DeleteMarker, MarkerList, NewMarker, RemoveImage, SaveMapPosition,
        UpdateMarker,
    },
    image::Image,
    map_position::MapPosition,
    marker::Marker,
    session::SessionHash,
    LngLat,
};

use crate::{
    api::{FetchError, FetchResult, MarkerApi},
    image_host::{ImageFile, ImageHost, UploadError},
    ui::{Clipboard, MapOverlay, Notifier, UrlState},
};

pub const HASH: &str = "Zq3v-_x8Yb2Qm9TnLk4Wp7Rs1Dh6Fg0JcVe5Ua2Xo";

pub fn session_hash() -> SessionHash {
    SessionHash::parse(HASH).unwrap()
}

/// The real service running on an in-memory database.
#[derive(Clone, Default)]
pub struct FakeApi {
    pub database: MemoryDatabase,
}

impl FakeApi {
    fn client(&self) -> Client<MemoryDatabase> {
        Client::new(self.database.clone())
    }
}

fn server(why: RequestError) -> FetchError {
    FetchError::Server(why.to_string())
}

#[async_trait]
impl MarkerApi for FakeApi {
    async fn generate_session_hash(&self) -> FetchResult<SessionHash> {
        self.client().generate_session_hash().map_err(server)
    }

    async fn list_markers(&self, session_hash: &SessionHash) -> FetchResult<MarkerList> {
        self.client()
            .list_markers(session_hash.as_str())
            .await
            .map_err(server)
    }

    async fn create_marker(&self, new_marker: NewMarker) -> FetchResult<Marker> {
        self.client().create_marker(new_marker).await.map_err(server)
    }

    async fn update_marker(&self, update: UpdateMarker) -> FetchResult<Marker> {
        self.client().update_marker(update).await.map_err(server)
    }

    async fn delete_marker(&self, delete: DeleteMarker) -> FetchResult<i32> {
        self.client()
            .delete_marker(delete)
            .await
            .map(|id| id.raw())
            .map_err(server)
    }

    async fn save_map_position(&self, position: SaveMapPosition) -> FetchResult<MapPosition> {
        self.client()
            .save_map_position(position)
            .await
            .map_err(server)
    }

    async fn attach_image(&self, attach: AttachImage) -> FetchResult<Image> {
        self.client().attach_image(attach).await.map_err(server)
    }

    async fn remove_image(&self, remove: RemoveImage) -> FetchResult<i32> {
        self.client()
            .remove_image(remove)
            .await
            .map(|id| id.raw())
            .map_err(server)
    }
}

#[derive(Debug, Default)]
pub struct OverlayState {
    next_handle: u32,
    pub pins: HashMap<u32, LngLat>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeOverlay {
    pub state: Arc<Mutex<OverlayState>>,
}

impl FakeOverlay {
    pub fn pin(&self, handle: u32) -> Option<LngLat> {
        self.state.lock().unwrap().pins.get(&handle).copied()
    }

    pub fn pin_count(&self) -> usize {
        self.state.lock().unwrap().pins.len()
    }
}

impl MapOverlay for FakeOverlay {
    type Handle = u32;

    fn add(&mut self, position: LngLat) -> u32 {
        let mut state = self.state.lock().unwrap();
        state.next_handle += 1;
        let handle = state.next_handle;
        state.pins.insert(handle, position);
        handle
    }

    fn set_position(&mut self, handle: &u32, position: LngLat) {
        self.state.lock().unwrap().pins.insert(*handle, position);
    }

    fn remove(&mut self, handle: &u32) {
        self.state.lock().unwrap().pins.remove(handle);
    }
}

#[derive(Debug, Clone)]
pub struct FakeNotifier {
    pub alerts: Arc<Mutex<Vec<String>>>,
    pub answer: bool,
}

impl FakeNotifier {
    pub fn answering(answer: bool) -> Self {
        Self {
            alerts: Arc::default(),
            answer,
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Default for FakeNotifier {
    fn default() -> Self {
        Self::answering(true)
    }
}

impl Notifier for FakeNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_owned());
    }

    fn confirm(&self, _question: &str) -> bool {
        self.answer
    }
}

#[derive(Debug, Default)]
pub struct FakeClipboard {
    pub text: Option<String>,
    pub denied: bool,
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.denied {
            return Err("clipboard access denied".into());
        }
        self.text = Some(text.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FakeUrl {
    pub state: Arc<Mutex<(Option<String>, usize)>>,
}

impl FakeUrl {
    pub fn with_session_hash(session_hash: Option<&str>) -> Self {
        Self {
            state: Arc::new(Mutex::new((session_hash.map(str::to_owned), 0))),
        }
    }

    pub fn replacements(&self) -> usize {
        self.state.lock().unwrap().1
    }
}

impl UrlState for FakeUrl {
    fn session_hash(&self) -> Option<String> {
        self.state.lock().unwrap().0.clone()
    }

    fn replace_session_hash(&mut self, session_hash: &SessionHash) {
        let mut state = self.state.lock().unwrap();
        state.0 = Some(session_hash.to_string());
        state.1 += 1;
    }

    fn origin(&self) -> String {
        "http://localhost:8080".to_owned()
    }
}

/// Hands out a URL per file, except for files named `broken.png`.
#[derive(Debug, Default)]
pub struct FakeImageHost;

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError> {
        if file.name == "broken.png" {
            return Err(UploadError::Rejected("Invalid image source".to_owned()));
        }
        Ok(format!("https://i.ibb.co/test/{}", file.name))
    }
}
