use model::{
    api::{
        AttachImage, DeleteMarker, MarkerList, NewMarker, RemoveImage, SaveMapPosition,
        UpdateMarker,
    },
    image::Image,
    map_position::MapPosition,
    marker::Marker,
    session::SessionHash,
};
use utility::id::Id;

use crate::{
    database::{
        Database, DatabaseError, MapPositionDraft, MapPositionRepo, MarkerDraft,
        MarkerPatch, MarkerRepo,
    },
    session, RequestError, RequestResult,
};

/// Entry point for everything the web layer does with markers and map
/// positions. Holds no state besides the database handle and is cheap to clone.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub fn generate_session_hash(&self) -> RequestResult<SessionHash> {
        Ok(session::generate_session_hash()?)
    }

    pub async fn list_markers(&self, session_hash: &str) -> RequestResult<MarkerList> {
        let session_hash = SessionHash::parse(session_hash)?;
        let mut db = self.database.auto();
        let markers = db.markers_by_session(&session_hash).await?;
        let map_position = db.map_position(&session_hash).await?;
        Ok(MarkerList {
            markers,
            map_position,
        })
    }

    pub async fn create_marker(&self, new_marker: NewMarker) -> RequestResult<Marker> {
        let session_hash = SessionHash::parse(new_marker.session_hash)?;
        check_coordinate("latitude", new_marker.latitude)?;
        check_coordinate("longitude", new_marker.longitude)?;
        let draft = MarkerDraft {
            latitude: new_marker.latitude,
            longitude: new_marker.longitude,
            description: new_marker.description.unwrap_or_default(),
            picture_url: new_marker.picture_url.filter(|url| !url.is_empty()),
            session_hash,
        };
        Ok(self.database.auto().insert_marker(draft).await?)
    }

    pub async fn update_marker(&self, update: UpdateMarker) -> RequestResult<Marker> {
        let session_hash = SessionHash::parse(update.session_hash)?;
        if let Some(latitude) = update.latitude {
            check_coordinate("latitude", latitude)?;
        }
        if let Some(longitude) = update.longitude {
            check_coordinate("longitude", longitude)?;
        }
        let patch = MarkerPatch {
            description: update.description,
            latitude: update.latitude,
            longitude: update.longitude,
            picture_url: update.picture_url.filter(|url| !url.is_empty()),
        };
        let result = self
            .database
            .auto()
            .update_marker(update.id, &session_hash, patch)
            .await;
        self.resolve(update.id, result).await
    }

    pub async fn delete_marker(&self, delete: DeleteMarker) -> RequestResult<Id<Marker>> {
        let session_hash = SessionHash::parse(delete.session_hash)?;
        let result = self
            .database
            .auto()
            .delete_marker(delete.id, &session_hash)
            .await;
        self.resolve(delete.id, result).await?;
        Ok(delete.id)
    }

    pub async fn save_map_position(
        &self,
        position: SaveMapPosition,
    ) -> RequestResult<MapPosition> {
        let session_hash = SessionHash::parse(position.session_hash)?;
        check_coordinate("center_longitude", position.center_longitude)?;
        check_coordinate("center_latitude", position.center_latitude)?;
        if !position.zoom_level.is_finite() || position.zoom_level < 0.0 {
            return Err(RequestError::invalid_input(
                "zoom_level must be a non-negative number",
            ));
        }
        let draft = MapPositionDraft {
            session_hash,
            center_longitude: position.center_longitude,
            center_latitude: position.center_latitude,
            zoom_level: position.zoom_level,
        };
        Ok(self.database.auto().put_map_position(draft).await?)
    }

    pub async fn attach_image(&self, attach: AttachImage) -> RequestResult<Image> {
        let session_hash = SessionHash::parse(attach.session_hash)?;
        if attach.image_url.trim().is_empty() {
            return Err(RequestError::invalid_input("image_url must not be empty"));
        }
        let result = self
            .database
            .auto()
            .set_picture(attach.marker_id, &session_hash, Some(attach.image_url))
            .await;
        let marker = self.resolve(attach.marker_id, result).await?;
        match marker.picture_url {
            Some(url) => Ok(Image::of_marker(marker.id, url)),
            None => Err(RequestError::invalid_input("picture was not stored")),
        }
    }

    pub async fn remove_image(&self, remove: RemoveImage) -> RequestResult<Id<Image>> {
        let session_hash = SessionHash::parse(remove.session_hash)?;
        let marker_id = Id::<Marker>::new(remove.image_id.raw());
        let result = self
            .database
            .auto()
            .set_picture(marker_id, &session_hash, None)
            .await;
        self.resolve(marker_id, result).await?;
        Ok(remove.image_id)
    }

    /// Turns a zero-row write into the matching error kind, by checking
    /// whether the marker exists at all.
    async fn resolve<T>(
        &self,
        id: Id<Marker>,
        result: Result<T, DatabaseError>,
    ) -> RequestResult<T> {
        match result {
            Err(DatabaseError::NotFound) => {
                let exists = self.database.auto().marker_exists(id).await?;
                if exists {
                    log::warn!("marker {} was addressed from a foreign session", id);
                    Err(RequestError::SessionMismatch)
                } else {
                    log::warn!("marker {} does not exist", id);
                    Err(RequestError::NotFound)
                }
            }
            other => Ok(other?),
        }
    }
}

fn check_coordinate(name: &str, value: f64) -> RequestResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RequestError::invalid_input(format!(
            "{} must be a finite number",
            name
        )))
    }
}
