use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::envelope::Envelope;
use crate::api::handlers;
use crate::model::{
    Aluno, AlunoTurma, Cargo, Classificacao, Curso, CursoClassificacao, CursoPreRequisito,
    CursoTrilha, Empresa, Entity, Funcionario, Pessoa, PreRequisito, Trilha, Turma, Usuario,
};
use crate::store::traits::{Repository, Store};

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check).fallback(unsupported_method))
        // People and organisations
        .merge(entity_routes::<S, Pessoa>())
        .merge(entity_routes::<S, Empresa>())
        .merge(entity_routes::<S, Aluno>())
        .merge(entity_routes::<S, Usuario>())
        .merge(entity_routes::<S, Cargo>())
        .merge(entity_routes::<S, Funcionario>())
        // Catalogue
        .merge(entity_routes::<S, Curso>())
        .merge(entity_routes::<S, Turma>())
        .merge(entity_routes::<S, Trilha>())
        .merge(entity_routes::<S, PreRequisito>())
        .merge(entity_routes::<S, Classificacao>())
        // Join rows, addressed as /<route>/<left>-<right>
        .merge(entity_routes::<S, AlunoTurma>())
        .merge(entity_routes::<S, CursoClassificacao>())
        .merge(entity_routes::<S, CursoPreRequisito>())
        .merge(entity_routes::<S, CursoTrilha>())
        .fallback(unknown_route)
        .layer(CorsLayer::permissive())
}

async fn unknown_route() -> impl IntoResponse {
    Envelope::<()>::failure(StatusCode::NOT_FOUND, "No such route")
}

async fn unsupported_method() -> impl IntoResponse {
    Envelope::<()>::failure(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed on this route")
}

/// Collection and member routes for one entity kind.
fn entity_routes<S, E>() -> Router<Arc<S>>
where
    S: Store + Repository<E> + 'static,
    E: Entity,
{
    let collection = format!("/{}", E::KIND.route());
    let member = format!("{}/:id", collection);

    Router::new()
        .route(
            &collection,
            get(handlers::list_entities::<S, E>)
                .post(handlers::create_entity::<S, E>)
                .fallback(unsupported_method),
        )
        .route(
            &member,
            get(handlers::get_entity::<S, E>)
                .put(handlers::update_entity::<S, E>)
                .patch(handlers::update_entity::<S, E>)
                .delete(handlers::delete_entity::<S, E>)
                .fallback(unsupported_method),
        )
}
