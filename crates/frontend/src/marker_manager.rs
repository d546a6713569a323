use std::fmt::Display;

use model::{
    api::{AttachImage, DeleteMarker, NewMarker, RemoveImage, UpdateMarker},
    image::Image,
    marker::Marker,
    session::SessionHash,
    LngLat,
};
use utility::id::Id;

use crate::{
    api::MarkerApi,
    image_host::{ImageFile, ImageHost},
    ui::{Clipboard, MapOverlay, Notifier},
};

/// A marker as the page knows it: the pin drawn for it and the data last
/// confirmed by the server.
#[derive(Debug, Clone)]
pub struct MarkerView<H> {
    pub id: Id<Marker>,
    pub handle: H,
    pub data: Marker,
}

/// Keeps the pins of one session on the map in step with the server.
///
/// Every change goes to the server first. Local state follows only once the
/// server accepted it; failures are shown through the [`Notifier`] and leave
/// local state as it was. Moving a marker is the exception: the pin jumps at
/// once and jumps back if the server refuses.
pub struct MarkerManager<A, O, N>
where
    A: MarkerApi,
    O: MapOverlay,
    N: Notifier,
{
    api: A,
    overlay: O,
    notifier: N,
    session_hash: SessionHash,
    markers: Vec<MarkerView<O::Handle>>,
    is_adding_marker: bool,
    moving_marker: Option<Id<Marker>>,
}

impl<A, O, N> MarkerManager<A, O, N>
where
    A: MarkerApi,
    O: MapOverlay,
    N: Notifier,
{
    pub fn new(api: A, overlay: O, notifier: N, session_hash: SessionHash) -> Self {
        Self {
            api,
            overlay,
            notifier,
            session_hash,
            markers: Vec::new(),
            is_adding_marker: false,
            moving_marker: None,
        }
    }

    pub fn markers(&self) -> &[MarkerView<O::Handle>] {
        &self.markers
    }

    pub fn marker(&self, id: Id<Marker>) -> Option<&MarkerView<O::Handle>> {
        self.markers.iter().find(|view| view.id == id)
    }

    pub fn session_hash(&self) -> &SessionHash {
        &self.session_hash
    }

    pub fn is_adding_marker(&self) -> bool {
        self.is_adding_marker
    }

    pub fn moving_marker(&self) -> Option<Id<Marker>> {
        self.moving_marker
    }

    /// Acts for another session from now on. Pins of the previous session
    /// are taken off the map; call [`Self::load_markers`] to show the new ones.
    pub fn set_session(&mut self, session_hash: SessionHash) {
        self.clear_overlays();
        self.is_adding_marker = false;
        self.moving_marker = None;
        self.session_hash = session_hash;
    }

    pub async fn load_markers(&mut self) -> Vec<Marker> {
        match self.api.list_markers(&self.session_hash).await {
            Ok(list) => {
                self.clear_overlays();
                for marker in &list.markers {
                    let handle = self.overlay.add(marker.lng_lat());
                    self.markers.push(MarkerView {
                        id: marker.id,
                        handle,
                        data: marker.clone(),
                    });
                }
                log::debug!("loaded {} markers", list.markers.len());
                list.markers
            }
            Err(why) => {
                self.report("load markers", why);
                Vec::new()
            }
        }
    }

    pub fn start_adding_marker(&mut self) {
        self.is_adding_marker = true;
        self.moving_marker = None;
    }

    pub fn cancel_adding_marker(&mut self) {
        self.is_adding_marker = false;
    }

    /// Places a new marker where the map was clicked. Does nothing unless
    /// [`Self::start_adding_marker`] was called first.
    pub async fn add_marker(&mut self, position: LngLat) -> Option<Marker> {
        if !self.is_adding_marker {
            return None;
        }
        let new_marker = NewMarker {
            latitude: position.lat,
            longitude: position.lng,
            description: Some(String::new()),
            picture_url: None,
            session_hash: self.session_hash.to_string(),
        };
        match self.api.create_marker(new_marker).await {
            Ok(marker) => {
                let handle = self.overlay.add(marker.lng_lat());
                self.markers.push(MarkerView {
                    id: marker.id,
                    handle,
                    data: marker.clone(),
                });
                self.is_adding_marker = false;
                Some(marker)
            }
            Err(why) => {
                self.report("add marker", why);
                None
            }
        }
    }

    pub async fn remove_marker(&mut self, id: Id<Marker>) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let delete = DeleteMarker {
            id,
            session_hash: self.session_hash.to_string(),
        };
        match self.api.delete_marker(delete).await {
            Ok(_) => {
                let view = self.markers.remove(index);
                self.overlay.remove(&view.handle);
                if self.moving_marker == Some(id) {
                    self.moving_marker = None;
                }
                true
            }
            Err(why) => {
                self.report("remove marker", why);
                false
            }
        }
    }

    pub async fn save_description(&mut self, id: Id<Marker>, description: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let update = UpdateMarker::new(id, &self.session_hash).description(description);
        match self.api.update_marker(update).await {
            Ok(marker) => {
                self.markers[index].data = marker;
                true
            }
            Err(why) => {
                self.report("save description", why);
                false
            }
        }
    }

    pub async fn update_marker_coordinates(
        &mut self,
        id: Id<Marker>,
        latitude: f64,
        longitude: f64,
    ) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let update = UpdateMarker::new(id, &self.session_hash).coordinates(latitude, longitude);
        match self.api.update_marker(update).await {
            Ok(marker) => {
                self.overlay
                    .set_position(&self.markers[index].handle, marker.lng_lat());
                self.markers[index].data = marker;
                true
            }
            Err(why) => {
                self.report("update coordinates", why);
                false
            }
        }
    }

    /// Enters move mode for `id`, or leaves it when `id` is already moving.
    /// Returns whether move mode is on afterwards.
    pub fn toggle_move_marker(&mut self, id: Id<Marker>) -> bool {
        if self.moving_marker == Some(id) {
            self.moving_marker = None;
            false
        } else {
            self.is_adding_marker = false;
            self.moving_marker = Some(id);
            true
        }
    }

    /// Moves the marker in move mode to where the map was clicked.
    pub async fn handle_move_marker(&mut self, position: LngLat) -> bool {
        let Some(id) = self.moving_marker else {
            return false;
        };
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let previous = self.markers[index].data.lng_lat();
        self.overlay
            .set_position(&self.markers[index].handle, position);

        let update =
            UpdateMarker::new(id, &self.session_hash).coordinates(position.lat, position.lng);
        match self.api.update_marker(update).await {
            Ok(marker) => {
                self.markers[index].data = marker;
                true
            }
            Err(why) => {
                self.overlay
                    .set_position(&self.markers[index].handle, previous);
                self.report("move marker", why);
                false
            }
        }
    }

    /// Uploads each file and attaches it to the marker. A failing file is
    /// reported and skipped. Returns the images that were attached.
    pub async fn upload_images<I: ImageHost>(
        &mut self,
        image_host: &I,
        id: Id<Marker>,
        files: &[ImageFile],
    ) -> Vec<Image> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        let mut images = Vec::new();
        for file in files {
            let image_url = match image_host.upload(file).await {
                Ok(url) => url,
                Err(why) => {
                    self.report("upload image", why);
                    continue;
                }
            };
            let attach = AttachImage {
                marker_id: id,
                image_url,
                session_hash: self.session_hash.to_string(),
            };
            match self.api.attach_image(attach).await {
                Ok(image) => {
                    self.markers[index].data.picture_url = Some(image.url.clone());
                    images.push(image);
                }
                Err(why) => self.report("save image for marker", why),
            }
        }
        images
    }

    /// Detaches the picture of a marker.
    pub async fn remove_image(&mut self, id: Id<Marker>) -> bool {
        let remove = RemoveImage {
            image_id: Id::new(id.raw()),
            session_hash: self.session_hash.to_string(),
        };
        match self.api.remove_image(remove).await {
            Ok(_) => {
                if let Some(index) = self.index_of(id) {
                    self.markers[index].data.picture_url = None;
                }
                true
            }
            Err(why) => {
                self.report("remove image", why);
                false
            }
        }
    }

    pub async fn copy_coordinates<C: Clipboard>(
        &self,
        clipboard: &mut C,
        latitude: f64,
        longitude: f64,
    ) -> bool {
        let text = format!("{:.6}, {:.6}", latitude, longitude);
        match clipboard.write_text(&text).await {
            Ok(()) => true,
            Err(why) => {
                self.report("copy coordinates", why);
                false
            }
        }
    }

    fn index_of(&self, id: Id<Marker>) -> Option<usize> {
        self.markers.iter().position(|view| view.id == id)
    }

    fn clear_overlays(&mut self) {
        for view in self.markers.drain(..) {
            self.overlay.remove(&view.handle);
        }
    }

    fn report(&self, action: &str, why: impl Display) {
        log::error!("failed to {}: {}", action, why);
        self.notifier
            .alert(&format!("Could not {}: {}", action, why));
    }
}
