use std::{error, fmt, result};

use async_trait::async_trait;
use model::{map_position::MapPosition, marker::Marker, session::SessionHash};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("no matching row"),
            Self::Other(why) => write!(f, "database error: {}", why),
        }
    }
}

impl error::Error for DatabaseError {}

pub type Result<T> = result::Result<T, DatabaseError>;

/// A marker about to be inserted. Id and creation time are assigned by the
/// database.
#[derive(Debug, Clone)]
pub struct MarkerDraft {
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub picture_url: Option<String>,
    pub session_hash: SessionHash,
}

/// Fields to overwrite on an existing marker. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MarkerPatch {
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub picture_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MapPositionDraft {
    pub session_hash: SessionHash,
    pub center_longitude: f64,
    pub center_latitude: f64,
    pub zoom_level: f64,
}

#[async_trait]
pub trait MarkerRepo {
    async fn markers_by_session(&mut self, session_hash: &SessionHash)
        -> Result<Vec<Marker>>;

    async fn insert_marker(&mut self, draft: MarkerDraft) -> Result<Marker>;

    /// Fails with [`DatabaseError::NotFound`] if no marker with that id exists
    /// in that session.
    async fn update_marker(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
        patch: MarkerPatch,
    ) -> Result<Marker>;

    /// Fails with [`DatabaseError::NotFound`] if nothing was deleted.
    async fn delete_marker(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
    ) -> Result<()>;

    /// Sets or clears the picture. Unlike `update_marker`, `None` clears it.
    async fn set_picture(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
        picture_url: Option<String>,
    ) -> Result<Marker>;

    /// Whether a marker with that id exists in any session.
    async fn marker_exists(&mut self, id: Id<Marker>) -> Result<bool>;
}

#[async_trait]
pub trait MapPositionRepo {
    async fn map_position(
        &mut self,
        session_hash: &SessionHash,
    ) -> Result<Option<MapPosition>>;

    /// Inserts the position or overwrites the one stored for the same session.
    async fn put_map_position(&mut self, draft: MapPositionDraft) -> Result<MapPosition>;
}

pub trait DatabaseOperations: MarkerRepo + MapPositionRepo {}

impl<T> DatabaseOperations for T where T: MarkerRepo + MapPositionRepo {}

/// trait to implement a map marker database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
pub trait Database: Clone + Send + Sync + Sized {
    type Autocommit: DatabaseOperations + Send;

    fn auto(&self) -> Self::Autocommit;
}
