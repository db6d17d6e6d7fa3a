use anyhow::{anyhow, Result};

use crate::error::ServiceError;
use crate::model::{
    Aluno, Cargo, Classificacao, Curso, Empresa, Entity, EntityKind, Funcionario, Id, Pessoa,
    PreRequisito, Reference, Trilha, Turma, Usuario,
};
use crate::store::traits::{Repository, Store};

pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Fail with `NotFound` on the first reference whose target row is absent.
    pub async fn ensure_exists<S: Store>(
        store: &S,
        references: &[Reference],
    ) -> Result<(), ServiceError> {
        for reference in references {
            if !Self::exists(store, reference).await? {
                log::warn!(
                    "Unresolved reference {} -> {} {}",
                    reference.field,
                    reference.kind,
                    reference.id
                );
                return Err(ServiceError::not_found(reference.kind, reference.id));
            }
        }
        Ok(())
    }

    async fn exists<S: Store>(store: &S, reference: &Reference) -> Result<bool> {
        let id = reference.id;
        match reference.kind {
            EntityKind::Pessoa => row_exists::<Pessoa, S>(store, id).await,
            EntityKind::Empresa => row_exists::<Empresa, S>(store, id).await,
            EntityKind::Aluno => row_exists::<Aluno, S>(store, id).await,
            EntityKind::Usuario => row_exists::<Usuario, S>(store, id).await,
            EntityKind::Cargo => row_exists::<Cargo, S>(store, id).await,
            EntityKind::Funcionario => row_exists::<Funcionario, S>(store, id).await,
            EntityKind::Curso => row_exists::<Curso, S>(store, id).await,
            EntityKind::Turma => row_exists::<Turma, S>(store, id).await,
            EntityKind::Trilha => row_exists::<Trilha, S>(store, id).await,
            EntityKind::PreRequisito => row_exists::<PreRequisito, S>(store, id).await,
            EntityKind::Classificacao => row_exists::<Classificacao, S>(store, id).await,
            kind => Err(anyhow!("{} rows cannot be referenced by a single id", kind)),
        }
    }
}

async fn row_exists<E, S>(store: &S, id: Id) -> Result<bool>
where
    E: Entity<Key = Id>,
    S: Repository<E> + ?Sized,
{
    Ok(store.find_by_id(&id).await?.is_some())
}
