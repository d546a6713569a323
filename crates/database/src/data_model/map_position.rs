use async_trait::async_trait;
use chrono::{DateTime, Utc};
use map_markers::database::{MapPositionDraft, MapPositionRepo, Result};
use model::{map_position::MapPosition, session::SessionHash};
use sqlx::prelude::FromRow;

use crate::{queries::map_position, PgDatabaseAutocommit};

/// Table: `map_positions`
#[derive(Debug, Clone, FromRow)]
pub struct MapPositionRow {
    pub session_hash: String,
    pub center_longitude: f64,
    pub center_latitude: f64,
    pub zoom_level: f64,
    pub updated_at: DateTime<Utc>,
}

impl MapPositionRow {
    pub fn to_model(self) -> MapPosition {
        MapPosition {
            session_hash: SessionHash::from_storage(self.session_hash),
            center_longitude: self.center_longitude,
            center_latitude: self.center_latitude,
            zoom_level: self.zoom_level,
            updated_at: self.updated_at,
        }
    }
}

#[async_trait]
impl MapPositionRepo for PgDatabaseAutocommit {
    async fn map_position(
        &mut self,
        session_hash: &SessionHash,
    ) -> Result<Option<MapPosition>> {
        map_position::get_by_session(&self.pool, session_hash).await
    }

    async fn put_map_position(&mut self, draft: MapPositionDraft) -> Result<MapPosition> {
        map_position::put(&self.pool, draft).await
    }
}
