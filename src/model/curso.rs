use crate::model::entity::surrogate_entity;
use crate::model::{EntityKind, Id, Reference, Referencia, Timestamps};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curso {
    #[serde(default)]
    pub id: Option<Id>,
    pub nome_curso: String,
    pub desc_curso: Option<String>,
    pub programacao: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Curso {
    pub fn new(nome_curso: impl Into<String>) -> Self {
        Self {
            id: None,
            nome_curso: nome_curso.into(),
            desc_curso: None,
            programacao: None,
            timestamps: Timestamps::default(),
        }
    }
}

/// Class: one offering of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turma {
    #[serde(default)]
    pub id: Option<Id>,
    pub nome_turma: String,
    pub curso: Option<Referencia>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub vagas: Option<u32>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Turma {
    pub fn new(nome_turma: impl Into<String>, curso: Option<Id>) -> Self {
        Self {
            id: None,
            nome_turma: nome_turma.into(),
            curso: curso.map(Referencia::new),
            data_inicio: None,
            data_fim: None,
            vagas: None,
            timestamps: Timestamps::default(),
        }
    }
}

fn turma_references(turma: &Turma) -> Vec<Reference> {
    turma
        .curso
        .map(|r| Reference::new("curso", EntityKind::Curso, r.id))
        .into_iter()
        .collect()
}

/// Learning track grouping courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trilha {
    #[serde(default)]
    pub id: Option<Id>,
    pub nome_trilha: String,
    pub desc_trilha: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Trilha {
    pub fn new(nome_trilha: impl Into<String>) -> Self {
        Self {
            id: None,
            nome_trilha: nome_trilha.into(),
            desc_trilha: None,
            timestamps: Timestamps::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreRequisito {
    #[serde(default)]
    pub id: Option<Id>,
    pub nome_pre_requisito: String,
    pub desc_pre_requisito: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl PreRequisito {
    pub fn new(nome_pre_requisito: impl Into<String>) -> Self {
        Self {
            id: None,
            nome_pre_requisito: nome_pre_requisito.into(),
            desc_pre_requisito: None,
            timestamps: Timestamps::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classificacao {
    #[serde(default)]
    pub id: Option<Id>,
    pub nome_classificacao: String,
    pub desc_classificacao: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Classificacao {
    pub fn new(nome_classificacao: impl Into<String>) -> Self {
        Self {
            id: None,
            nome_classificacao: nome_classificacao.into(),
            desc_classificacao: None,
            timestamps: Timestamps::default(),
        }
    }
}

surrogate_entity!(
    Curso,
    EntityKind::Curso,
    ["nomeCurso", "descCurso", "programacao"]
);
surrogate_entity!(
    Turma,
    EntityKind::Turma,
    ["nomeTurma", "curso", "dataInicio", "dataFim", "vagas"],
    references = turma_references
);
surrogate_entity!(Trilha, EntityKind::Trilha, ["nomeTrilha", "descTrilha"]);
surrogate_entity!(
    PreRequisito,
    EntityKind::PreRequisito,
    ["nomePreRequisito", "descPreRequisito"]
);
surrogate_entity!(
    Classificacao,
    EntityKind::Classificacao,
    ["nomeClassificacao", "descClassificacao"]
);
