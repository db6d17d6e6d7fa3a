use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

pub type Id = i64;

/// Parse a path identifier into the store's native key type.
pub fn parse_id(raw: &str) -> Result<Id, ServiceError> {
    raw.trim()
        .parse::<Id>()
        .map_err(|_| ServiceError::InvalidArgument(format!("'{}' is not a valid id", raw)))
}

/// Key types the repositories can index rows by.
pub trait EntityKey:
    Copy + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    fn parse(raw: &str) -> Result<Self, ServiceError>;
}

impl EntityKey for Id {
    fn parse(raw: &str) -> Result<Self, ServiceError> {
        parse_id(raw)
    }
}

/// Composite identity of a join row: the two foreign ids it connects.
///
/// Textual form is `"{left}-{right}"`, e.g. `3-7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub left: Id,
    pub right: Id,
}

impl PairKey {
    pub fn new(left: Id, right: Id) -> Self {
        Self { left, right }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.left, self.right)
    }
}

impl EntityKey for PairKey {
    fn parse(raw: &str) -> Result<Self, ServiceError> {
        let (left, right) = raw.split_once('-').ok_or_else(|| {
            ServiceError::InvalidArgument(format!(
                "'{}' is not a composite id of the form <left>-<right>",
                raw
            ))
        })?;
        Ok(Self::new(parse_id(left)?, parse_id(right)?))
    }
}

/// Nested reference object as it travels on the wire: `{"id": 99}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referencia {
    pub id: Id,
}

impl Referencia {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

/// Creation/update stamps carried by every entity.
///
/// Assigned by the services right before a save; whatever a caller sends
/// for them is overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timestamps {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Every entity kind the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Pessoa,
    Empresa,
    Aluno,
    Usuario,
    Cargo,
    Funcionario,
    Curso,
    Turma,
    Trilha,
    PreRequisito,
    Classificacao,
    AlunoTurma,
    CursoClassificacao,
    CursoPreRequisito,
    CursoTrilha,
}

impl EntityKind {
    pub const ALL: [EntityKind; 15] = [
        EntityKind::Pessoa,
        EntityKind::Empresa,
        EntityKind::Aluno,
        EntityKind::Usuario,
        EntityKind::Cargo,
        EntityKind::Funcionario,
        EntityKind::Curso,
        EntityKind::Turma,
        EntityKind::Trilha,
        EntityKind::PreRequisito,
        EntityKind::Classificacao,
        EntityKind::AlunoTurma,
        EntityKind::CursoClassificacao,
        EntityKind::CursoPreRequisito,
        EntityKind::CursoTrilha,
    ];

    /// Route segment, also used as the storage discriminator.
    pub fn route(&self) -> &'static str {
        match self {
            EntityKind::Pessoa => "pessoas",
            EntityKind::Empresa => "empresas",
            EntityKind::Aluno => "alunos",
            EntityKind::Usuario => "usuarios",
            EntityKind::Cargo => "cargos",
            EntityKind::Funcionario => "funcionarios",
            EntityKind::Curso => "cursos",
            EntityKind::Turma => "turmas",
            EntityKind::Trilha => "trilhas",
            EntityKind::PreRequisito => "pre-requisitos",
            EntityKind::Classificacao => "classificacoes",
            EntityKind::AlunoTurma => "alunos-turmas",
            EntityKind::CursoClassificacao => "cursos-classificacoes",
            EntityKind::CursoPreRequisito => "cursos-pre-requisitos",
            EntityKind::CursoTrilha => "cursos-trilhas",
        }
    }

    /// Join kinds are keyed by a pair of foreign ids instead of a surrogate id.
    pub fn is_join(&self) -> bool {
        matches!(
            self,
            EntityKind::AlunoTurma
                | EntityKind::CursoClassificacao
                | EntityKind::CursoPreRequisito
                | EntityKind::CursoTrilha
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
