use async_trait::async_trait;
use chrono::{DateTime, Utc};
use map_markers::database::{MarkerDraft, MarkerPatch, MarkerRepo, Result};
use model::{marker::Marker, session::SessionHash};
use sqlx::prelude::FromRow;
use utility::id::Id;

use crate::{queries::marker, PgDatabaseAutocommit};

/// Table: `markers`
#[derive(Debug, Clone, FromRow)]
pub struct MarkerRow {
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub picture_url: Option<String>,
    pub session_hash: String,
    pub created_at: DateTime<Utc>,
}

impl MarkerRow {
    pub fn to_model(self) -> Marker {
        Marker {
            id: Id::new(self.id),
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            picture_url: self.picture_url,
            session_hash: SessionHash::from_storage(self.session_hash),
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl MarkerRepo for PgDatabaseAutocommit {
    async fn markers_by_session(
        &mut self,
        session_hash: &SessionHash,
    ) -> Result<Vec<Marker>> {
        marker::get_by_session(&self.pool, session_hash).await
    }

    async fn insert_marker(&mut self, draft: MarkerDraft) -> Result<Marker> {
        marker::insert(&self.pool, draft).await
    }

    async fn update_marker(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
        patch: MarkerPatch,
    ) -> Result<Marker> {
        marker::update(&self.pool, id, session_hash, patch).await
    }

    async fn delete_marker(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
    ) -> Result<()> {
        marker::delete(&self.pool, id, session_hash).await
    }

    async fn set_picture(
        &mut self,
        id: Id<Marker>,
        session_hash: &SessionHash,
        picture_url: Option<String>,
    ) -> Result<Marker> {
        marker::set_picture(&self.pool, id, session_hash, picture_url).await
    }

    async fn marker_exists(&mut self, id: Id<Marker>) -> Result<bool> {
        marker::exists(&self.pool, id).await
    }
}
