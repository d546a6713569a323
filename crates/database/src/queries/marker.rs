use map_markers::database::{DatabaseError, MarkerDraft, MarkerPatch, Result};
use model::{marker::Marker, session::SessionHash};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::marker::MarkerRow;

use super::convert_error;

pub async fn get_by_session<'c, E>(
    executor: E,
    session_hash: &SessionHash,
) -> Result<Vec<Marker>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, latitude, longitude, description, picture_url, session_hash, created_at
        FROM
            markers
        WHERE
            session_hash = $1
        ORDER BY
            id ASC;
        ",
    )
    .bind(session_hash.as_str())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<MarkerRow>| {
        Ok(rows.into_iter().map(MarkerRow::to_model).collect())
    })
}

pub async fn insert<'c, E>(executor: E, draft: MarkerDraft) -> Result<Marker>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO markers(
            latitude,
            longitude,
            description,
            picture_url,
            session_hash
        )
        VALUES ($1, $2, $3, $4, $5)
        RETURNING
            id, latitude, longitude, description, picture_url, session_hash, created_at;
        ",
    )
    .bind(draft.latitude)
    .bind(draft.longitude)
    .bind(draft.description)
    .bind(draft.picture_url)
    .bind(draft.session_hash.into_inner())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(MarkerRow::to_model)
}

/// Overwrites the given fields. Zero matched rows, because of a wrong id or a
/// foreign session, fail with `NotFound`.
pub async fn update<'c, E>(
    executor: E,
    id: Id<Marker>,
    session_hash: &SessionHash,
    patch: MarkerPatch,
) -> Result<Marker>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE
            markers
        SET
            description = COALESCE($3, description),
            latitude = COALESCE($4, latitude),
            longitude = COALESCE($5, longitude),
            picture_url = COALESCE($6, picture_url)
        WHERE
            id = $1 AND session_hash = $2
        RETURNING
            id, latitude, longitude, description, picture_url, session_hash, created_at;
        ",
    )
    .bind(id.raw())
    .bind(session_hash.as_str())
    .bind(patch.description)
    .bind(patch.latitude)
    .bind(patch.longitude)
    .bind(patch.picture_url)
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(MarkerRow::to_model)
    .ok_or(DatabaseError::NotFound)
}

pub async fn set_picture<'c, E>(
    executor: E,
    id: Id<Marker>,
    session_hash: &SessionHash,
    picture_url: Option<String>,
) -> Result<Marker>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE
            markers
        SET
            picture_url = $3
        WHERE
            id = $1 AND session_hash = $2
        RETURNING
            id, latitude, longitude, description, picture_url, session_hash, created_at;
        ",
    )
    .bind(id.raw())
    .bind(session_hash.as_str())
    .bind(picture_url)
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(MarkerRow::to_model)
    .ok_or(DatabaseError::NotFound)
}

pub async fn delete<'c, E>(
    executor: E,
    id: Id<Marker>,
    session_hash: &SessionHash,
) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query(
        "
        DELETE FROM
            markers
        WHERE
            id = $1 AND session_hash = $2;
        ",
    )
    .bind(id.raw())
    .bind(session_hash.as_str())
    .execute(executor)
    .await
    .map_err(convert_error)?;

    if result.rows_affected() == 0 {
        Err(DatabaseError::NotFound)
    } else {
        Ok(())
    }
}

pub async fn exists<'c, E>(executor: E, id: Id<Marker>) -> Result<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM markers WHERE id = $1);")
        .bind(id.raw())
        .fetch_one(executor)
        .await
        .map_err(convert_error)
}
