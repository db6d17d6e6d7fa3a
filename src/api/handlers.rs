use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::envelope::Envelope;
use crate::error::ServiceError;
use crate::logic::EntityService;
use crate::model::{Entity, Patch};
use crate::store::traits::{Repository, Store};

pub type AppState<S> = Arc<S>;

type EntityResponse<T> = Result<Envelope<T>, ServiceError>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn list_entities<S, E>(State(store): State<AppState<S>>) -> EntityResponse<Vec<E>>
where
    S: Store + Repository<E> + 'static,
    E: Entity,
{
    let items = EntityService::<S, E>::new(&store).list().await?;
    Ok(Envelope::success(
        StatusCode::OK,
        format!("{} {} rows", items.len(), E::KIND),
        items,
    ))
}

pub async fn get_entity<S, E>(
    State(store): State<AppState<S>>,
    Path(id): Path<String>,
) -> EntityResponse<E>
where
    S: Store + Repository<E> + 'static,
    E: Entity,
{
    let entity = EntityService::<S, E>::new(&store).get(&id).await?;
    Ok(Envelope::success(
        StatusCode::OK,
        format!("{} {} found", E::KIND, id),
        entity,
    ))
}

pub async fn create_entity<S, E>(
    State(store): State<AppState<S>>,
    payload: Result<RequestJson<E>, JsonRejection>,
) -> EntityResponse<E>
where
    S: Store + Repository<E> + 'static,
    E: Entity,
{
    let RequestJson(entity) = payload?;
    let created = EntityService::<S, E>::new(&store).create(entity).await?;
    Ok(Envelope::success(
        StatusCode::CREATED,
        format!("{} created", E::KIND),
        created,
    ))
}

pub async fn update_entity<S, E>(
    State(store): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<RequestJson<Patch>, JsonRejection>,
) -> EntityResponse<E>
where
    S: Store + Repository<E> + 'static,
    E: Entity,
{
    let RequestJson(patch) = payload?;
    let updated = EntityService::<S, E>::new(&store).update(&id, patch).await?;
    Ok(Envelope::success(
        StatusCode::OK,
        format!("{} {} updated", E::KIND, id),
        updated,
    ))
}

pub async fn delete_entity<S, E>(
    State(store): State<AppState<S>>,
    Path(id): Path<String>,
) -> EntityResponse<E>
where
    S: Store + Repository<E> + 'static,
    E: Entity,
{
    let deleted = EntityService::<S, E>::new(&store).delete(&id).await?;
    Ok(Envelope::success(
        StatusCode::OK,
        format!("{} {} deleted", E::KIND, id),
        deleted,
    ))
}
