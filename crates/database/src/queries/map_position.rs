use map_markers::database::{MapPositionDraft, Result};
use model::{map_position::MapPosition, session::SessionHash};
use sqlx::{Executor, Postgres};

use crate::data_model::map_position::MapPositionRow;

use super::convert_error;

pub async fn get_by_session<'c, E>(
    executor: E,
    session_hash: &SessionHash,
) -> Result<Option<MapPosition>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            session_hash, center_longitude, center_latitude, zoom_level, updated_at
        FROM
            map_positions
        WHERE
            session_hash = $1;
        ",
    )
    .bind(session_hash.as_str())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)
    .map(|row: Option<MapPositionRow>| row.map(MapPositionRow::to_model))
}

pub async fn put<'c, E>(executor: E, draft: MapPositionDraft) -> Result<MapPosition>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO map_positions(
            session_hash,
            center_longitude,
            center_latitude,
            zoom_level
        )
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (session_hash)
        DO UPDATE SET
            center_longitude = EXCLUDED.center_longitude,
            center_latitude = EXCLUDED.center_latitude,
            zoom_level = EXCLUDED.zoom_level,
            updated_at = NOW()
        RETURNING
            session_hash, center_longitude, center_latitude, zoom_level, updated_at;
        ",
    )
    .bind(draft.session_hash.into_inner())
    .bind(draft.center_longitude)
    .bind(draft.center_latitude)
    .bind(draft.zoom_level)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(MapPositionRow::to_model)
}
