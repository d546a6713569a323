//! A database living in process memory. Serves tests and demos; everything is
//! lost when the last handle is dropped.

use std::{
    collections::HashMap,
    error, fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use chrono::Utc;
use model::{map_position::MapPosition, marker::Marker, session::SessionHash};
use utility::id::Id;

use crate::database::{
    Database, DatabaseError, MapPositionDraft, MapPositionRepo, MarkerDraft, MarkerPatch,
    MarkerRepo, Result,
};

#[derive(Debug)]
struct MemoryError(&'static str);

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl error::Error for MemoryError {}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    markers: Vec<Marker>,
    map_positions: HashMap<SessionHash, MapPosition>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails as if the connection was lost.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn map_position_count(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.map_positions.len())
            .unwrap_or_default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::Other(Box::new(MemoryError(
                "database is unavailable",
            ))));
        }
        self.state
            .lock()
            .map_err(|_| DatabaseError::Other(Box::new(MemoryError("state lock poisoned"))))
    }
}

impl Database for MemoryDatabase {
    type Autocommit = MemoryDatabase;

    fn auto(&self) -> Self::Autocommit {
        self.clone()
    }
}

impl MemoryState {
    fn owned_marker(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
    ) -> Result<&mut Marker> {
        self.markers
            .iter_mut()
            .find(|marker| marker.id == id && &marker.session_hash == session_hash)
            .ok_or(DatabaseError::NotFound)
    }
}

#[async_trait]
impl MarkerRepo for MemoryDatabase {
    async fn markers_by_session(
        &mut self,
        session_hash: &SessionHash,
    ) -> Result<Vec<Marker>> {
        Ok(self
            .state()?
            .markers
            .iter()
            .filter(|marker| &marker.session_hash == session_hash)
            .cloned()
            .collect())
    }

    async fn insert_marker(&mut self, draft: MarkerDraft) -> Result<Marker> {
        let mut state = self.state()?;
        state.last_id += 1;
        let marker = Marker {
            id: Id::new(state.last_id),
            latitude: draft.latitude,
            longitude: draft.longitude,
            description: draft.description,
            picture_url: draft.picture_url,
            session_hash: draft.session_hash,
            created_at: Utc::now(),
        };
        state.markers.push(marker.clone());
        Ok(marker)
    }

    async fn update_marker(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
        patch: MarkerPatch,
    ) -> Result<Marker> {
        let mut state = self.state()?;
        let marker = state.owned_marker(id, session_hash)?;
        if let Some(description) = patch.description {
            marker.description = description;
        }
        if let Some(latitude) = patch.latitude {
            marker.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            marker.longitude = longitude;
        }
        if let Some(picture_url) = patch.picture_url {
            marker.picture_url = Some(picture_url);
        }
        Ok(marker.clone())
    }

    async fn delete_marker(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
    ) -> Result<()> {
        let mut state = self.state()?;
        let before = state.markers.len();
        state
            .markers
            .retain(|marker| !(marker.id == id && &marker.session_hash == session_hash));
        if state.markers.len() == before {
            Err(DatabaseError::NotFound)
        } else {
            Ok(())
        }
    }

    async fn set_picture(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
        picture_url: Option<String>,
    ) -> Result<Marker> {
        let mut state = self.state()?;
        let marker = state.owned_marker(id, session_hash)?;
        marker.picture_url = picture_url;
        Ok(marker.clone())
    }

    async fn marker_exists(&mut self, id: Id<Marker>) -> Result<bool> {
        Ok(self.state()?.markers.iter().any(|marker| marker.id == id))
    }
}

#[async_trait]
impl MapPositionRepo for MemoryDatabase {
    async fn map_position(
        &mut self,
        session_hash: &SessionHash,
    ) -> Result<Option<MapPosition>> {
        Ok(self.state()?.map_positions.get(session_hash).cloned())
    }

    async fn put_map_position(&mut self, draft: MapPositionDraft) -> Result<MapPosition> {
        let position = MapPosition {
            session_hash: draft.session_hash.clone(),
            center_longitude: draft.center_longitude,
            center_latitude: draft.center_latitude,
            zoom_level: draft.zoom_level,
            updated_at: Utc::now(),
        };
        self.state()?
            .map_positions
            .insert(draft.session_hash, position.clone());
        Ok(position)
    }
}
