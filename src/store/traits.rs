use crate::model::{
    Aluno, AlunoTurma, Cargo, Classificacao, Curso, CursoClassificacao, CursoPreRequisito,
    CursoTrilha, Empresa, Entity, Funcionario, Pessoa, PreRequisito, Trilha, Turma, Usuario,
};
use anyhow::Result;

/// Persistence capabilities for one entity kind.
#[async_trait::async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find_by_id(&self, key: &E::Key) -> Result<Option<E>>;
    async fn find_all(&self) -> Result<Vec<E>>;
    /// Insert or replace by key. Rows without a key get the next id of their kind.
    async fn save(&self, entity: E) -> Result<E>;
    async fn delete_by_id(&self, key: &E::Key) -> Result<bool>;
}

pub trait Store:
    Repository<Pessoa>
    + Repository<Empresa>
    + Repository<Aluno>
    + Repository<Usuario>
    + Repository<Cargo>
    + Repository<Funcionario>
    + Repository<Curso>
    + Repository<Turma>
    + Repository<Trilha>
    + Repository<PreRequisito>
    + Repository<Classificacao>
    + Repository<AlunoTurma>
    + Repository<CursoClassificacao>
    + Repository<CursoPreRequisito>
    + Repository<CursoTrilha>
    + Send
    + Sync
{
}
