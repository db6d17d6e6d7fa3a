use std::marker::PhantomData;

use crate::error::{ServiceError, ServiceResult};
use crate::logic::clock::{stamp_created, stamp_updated};
use crate::logic::merge::{merge_patch, MergeOutcome};
use crate::logic::resolve::ReferenceResolver;
use crate::model::{Entity, EntityKey, Patch};
use crate::store::traits::{Repository, Store};

/// CRUD over one entity kind: key parsing, reference resolution, allow-list
/// merge and timestamp stamping in front of the store.
///
/// There is no locking between the read and the write of `update`; two
/// concurrent updates of one row race and the last save wins.
pub struct EntityService<'a, S, E> {
    store: &'a S,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, S, E> EntityService<'a, S, E>
where
    S: Store + Repository<E>,
    E: Entity,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<E>> {
        Ok(<S as Repository<E>>::find_all(self.store).await?)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<E> {
        let key = E::Key::parse(id)?;
        self.find(&key).await
    }

    pub async fn create(&self, mut entity: E) -> ServiceResult<E> {
        entity.clear_id();
        *entity.timestamps_mut() = Default::default();

        if E::KIND.is_join() {
            let key = entity.key().ok_or_else(|| {
                ServiceError::InvalidArgument(format!(
                    "{} requires both foreign ids",
                    E::KIND
                ))
            })?;
            if <S as Repository<E>>::find_by_id(self.store, &key)
                .await?
                .is_some()
            {
                return Err(ServiceError::conflict(E::KIND, key));
            }
        }

        ReferenceResolver::ensure_exists(self.store, &entity.references()).await?;

        stamp_created(entity.timestamps_mut());
        let saved = <S as Repository<E>>::save(self.store, entity).await?;
        log::info!("Created {} {}", E::KIND, display_key(&saved));
        Ok(saved)
    }

    pub async fn update(&self, id: &str, patch: Patch) -> ServiceResult<E> {
        let existing = self.get(id).await?;
        let MergeOutcome {
            mut merged,
            applied,
            ignored,
        } = merge_patch(&existing, &patch)?;
        if !ignored.is_empty() {
            log::debug!(
                "Ignoring non-mutable {} fields: {}",
                E::KIND,
                ignored.join(", ")
            );
        }

        let touched: Vec<_> = merged
            .references()
            .into_iter()
            .filter(|r| applied.contains(&r.field))
            .collect();
        ReferenceResolver::ensure_exists(self.store, &touched).await?;

        stamp_updated(merged.timestamps_mut());
        let saved = <S as Repository<E>>::save(self.store, merged).await?;
        log::info!(
            "Updated {} {} ({})",
            E::KIND,
            display_key(&saved),
            applied.join(", ")
        );
        Ok(saved)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<E> {
        let key = E::Key::parse(id)?;
        let snapshot = self.find(&key).await?;
        if !<S as Repository<E>>::delete_by_id(self.store, &key).await? {
            // Removed between the read and the delete.
            return Err(ServiceError::not_found(E::KIND, key));
        }
        log::info!("Deleted {} {}", E::KIND, key);
        Ok(snapshot)
    }

    async fn find(&self, key: &E::Key) -> ServiceResult<E> {
        <S as Repository<E>>::find_by_id(self.store, key)
            .await?
            .ok_or_else(|| ServiceError::not_found(E::KIND, key))
    }
}

fn display_key<E: Entity>(entity: &E) -> String {
    entity
        .key()
        .map(|k| k.to_string())
        .unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Aluno, AlunoTurma, Cargo, Curso, CursoTrilha, DadosPessoa, EntityKind, Funcionario,
        PairKey, Trilha, Turma, Usuario,
    };
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn patch(value: serde_json::Value) -> Patch {
        value.as_object().cloned().unwrap()
    }

    /// Counts every call that reaches the wrapped store.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl<E: Entity> Repository<E> for CountingStore {
        async fn find_by_id(&self, key: &E::Key) -> anyhow::Result<Option<E>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Repository::<E>::find_by_id(&self.inner, key).await
        }
        async fn find_all(&self) -> anyhow::Result<Vec<E>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Repository::<E>::find_all(&self.inner).await
        }
        async fn save(&self, entity: E) -> anyhow::Result<E> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Repository::<E>::save(&self.inner, entity).await
        }
        async fn delete_by_id(&self, key: &E::Key) -> anyhow::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Repository::<E>::delete_by_id(&self.inner, key).await
        }
    }

    impl Store for CountingStore {}

    #[tokio::test]
    async fn test_list_empty_store() {
        let store = MemoryStore::new();
        let cursos = EntityService::<_, Curso>::new(&store).list().await.unwrap();
        assert!(cursos.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStore::new();
        let service = EntityService::<_, Curso>::new(&store);

        let mut input = Curso::new("Algorithms");
        input.id = Some(77);
        let created = service.create(input.clone()).await.unwrap();

        assert_eq!(created.id, Some(1));
        assert!(created.timestamps.created_at.is_some());
        assert_eq!(created.desc_curso, None);
        assert_eq!(created.programacao, None);

        let fetched = service.get("1").await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.nome_curso, input.nome_curso);
    }

    #[tokio::test]
    async fn test_course_update_scenario() {
        let store = MemoryStore::new();
        let service = EntityService::<_, Curso>::new(&store);
        let created = service.create(Curso::new("Algorithms")).await.unwrap();

        let updated = service
            .update("1", patch(json!({"descCurso": "intro"})))
            .await
            .unwrap();

        assert_eq!(updated.desc_curso.as_deref(), Some("intro"));
        assert_eq!(updated.nome_curso, "Algorithms");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.timestamps.created_at, created.timestamps.created_at);
        assert!(updated.timestamps.updated_at > updated.timestamps.created_at);

        assert_eq!(service.get("1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_cannot_touch_identity_or_created_at() {
        let store = MemoryStore::new();
        let service = EntityService::<_, Curso>::new(&store);
        let created = service.create(Curso::new("Algorithms")).await.unwrap();

        let updated = service
            .update(
                "1",
                patch(json!({"id": 5, "createdAt": "2001-01-01T00:00:00Z", "nomeCurso": "Graphs"})),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, Some(1));
        assert_eq!(updated.timestamps.created_at, created.timestamps.created_at);
        assert_eq!(updated.nome_curso, "Graphs");
        assert!(service.get("5").await.is_err());
    }

    #[tokio::test]
    async fn test_get_invalid_id_never_reaches_store() {
        let store = CountingStore::default();
        let service = EntityService::<_, Curso>::new(&store);

        for id in ["abc", "1.0", ""] {
            assert!(matches!(
                service.get(id).await,
                Err(ServiceError::InvalidArgument(_))
            ));
            assert!(matches!(
                service.update(id, Patch::new()).await,
                Err(ServiceError::InvalidArgument(_))
            ));
            assert!(matches!(
                service.delete(id).await,
                Err(ServiceError::InvalidArgument(_))
            ));
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let store = MemoryStore::new();
        let service = EntityService::<_, Curso>::new(&store);

        assert!(matches!(
            service.get("3").await,
            Err(ServiceError::NotFound { kind: EntityKind::Curso, .. })
        ));
        assert!(matches!(
            service.update("3", patch(json!({"descCurso": "x"}))).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_and_is_not_idempotent() {
        let store = MemoryStore::new();
        let service = EntityService::<_, Curso>::new(&store);
        let created = service.create(Curso::new("Algorithms")).await.unwrap();

        let deleted = service.delete("1").await.unwrap();
        assert_eq!(deleted, created);

        assert!(matches!(
            service.get("1").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete("1").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_employee_with_missing_user_is_not_stored() {
        let store = MemoryStore::new();
        EntityService::<_, Cargo>::new(&store)
            .create(Cargo::new("Professor"))
            .await
            .unwrap();

        let service = EntityService::<_, Funcionario>::new(&store);
        let result = service
            .create(Funcionario::new(DadosPessoa::new("Ana"), Some(99), Some(1)))
            .await;

        match result {
            Err(ServiceError::NotFound { kind, id }) => {
                assert_eq!(kind, EntityKind::Usuario);
                assert_eq!(id, "99");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_employee_with_resolved_references() {
        let store = MemoryStore::new();
        EntityService::<_, Usuario>::new(&store)
            .create(Usuario::new("ana"))
            .await
            .unwrap();
        EntityService::<_, Cargo>::new(&store)
            .create(Cargo::new("Professor"))
            .await
            .unwrap();

        let service = EntityService::<_, Funcionario>::new(&store);
        let created = service
            .create(Funcionario::new(DadosPessoa::new("Ana"), Some(1), Some(1)))
            .await
            .unwrap();
        assert_eq!(created.id, Some(1));

        // Re-pointing the role at a missing row fails and leaves the row as is.
        let result = service.update("1", patch(json!({"cargo": {"id": 8}}))).await;
        assert!(matches!(
            result,
            Err(ServiceError::NotFound {
                kind: EntityKind::Cargo,
                ..
            })
        ));
        assert_eq!(service.get("1").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_update_skips_untouched_dangling_reference() {
        let store = MemoryStore::new();
        EntityService::<_, Curso>::new(&store)
            .create(Curso::new("Algorithms"))
            .await
            .unwrap();
        let turmas = EntityService::<_, Turma>::new(&store);
        turmas.create(Turma::new("2024.1", Some(1))).await.unwrap();

        EntityService::<_, Curso>::new(&store).delete("1").await.unwrap();

        let updated = turmas
            .update("1", patch(json!({"vagas": 40})))
            .await
            .unwrap();
        assert_eq!(updated.vagas, Some(40));
    }

    #[tokio::test]
    async fn test_join_entity_lifecycle() {
        let store = MemoryStore::new();
        EntityService::<_, Curso>::new(&store)
            .create(Curso::new("Algorithms"))
            .await
            .unwrap();
        EntityService::<_, Trilha>::new(&store)
            .create(Trilha::new("Backend"))
            .await
            .unwrap();

        let service = EntityService::<_, CursoTrilha>::new(&store);
        let created = service.create(CursoTrilha::new(1, 1, Some(1))).await.unwrap();
        assert_eq!(created.key(), Some(PairKey::new(1, 1)));

        assert!(matches!(
            service.create(CursoTrilha::new(1, 1, Some(2))).await,
            Err(ServiceError::Conflict { .. })
        ));

        let updated = service
            .update("1-1", patch(json!({"ordem": 3, "trilhaId": 9})))
            .await
            .unwrap();
        assert_eq!(updated.ordem, Some(3));
        assert_eq!(updated.trilha_id, Some(1));

        assert!(matches!(
            service.get("1").await,
            Err(ServiceError::InvalidArgument(_))
        ));

        service.delete("1-1").await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_join_entity_requires_existing_sides() {
        let store = MemoryStore::new();
        EntityService::<_, Aluno>::new(&store)
            .create(Aluno::new(DadosPessoa::new("Bruno"), Some("2024001".into())))
            .await
            .unwrap();

        let service = EntityService::<_, AlunoTurma>::new(&store);
        assert!(matches!(
            service.create(AlunoTurma::new(1, 4)).await,
            Err(ServiceError::NotFound { kind: EntityKind::Turma, .. })
        ));

        let mut partial = AlunoTurma::new(1, 4);
        partial.turma_id = None;
        assert!(matches!(
            service.create(partial).await,
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(service.list().await.unwrap().is_empty());
    }
}
