//! Many-to-many join rows. Each is identified by the pair of foreign ids it
//! connects; both ids must resolve before the row is written.

use crate::model::{Entity, EntityKind, Id, PairKey, Reference, Timestamps};
use serde::{Deserialize, Serialize};

/// Implements [`Entity`] for a join record keyed by two foreign id fields.
macro_rules! join_entity {
    (
        $ty:ty,
        $kind:expr,
        ($left:ident: $left_field:literal -> $left_kind:expr, $right:ident: $right_field:literal -> $right_kind:expr),
        [$($field:literal),* $(,)?]
    ) => {
        impl Entity for $ty {
            type Key = PairKey;

            const KIND: EntityKind = $kind;

            const MUTABLE_FIELDS: &'static [&'static str] = &[$($field),*];

            fn key(&self) -> Option<PairKey> {
                Some(PairKey::new(self.$left?, self.$right?))
            }

            fn timestamps(&self) -> &Timestamps {
                &self.timestamps
            }

            fn timestamps_mut(&mut self) -> &mut Timestamps {
                &mut self.timestamps
            }

            fn references(&self) -> Vec<Reference> {
                let left = self.$left.map(|id| Reference::new($left_field, $left_kind, id));
                let right = self.$right.map(|id| Reference::new($right_field, $right_kind, id));
                left.into_iter().chain(right).collect()
            }
        }
    };
}

/// Student enrolled in a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlunoTurma {
    pub aluno_id: Option<Id>,
    pub turma_id: Option<Id>,
    pub situacao: Option<String>,
    pub nota: Option<f64>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl AlunoTurma {
    pub fn new(aluno_id: Id, turma_id: Id) -> Self {
        Self {
            aluno_id: Some(aluno_id),
            turma_id: Some(turma_id),
            situacao: None,
            nota: None,
            timestamps: Timestamps::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursoClassificacao {
    pub curso_id: Option<Id>,
    pub classificacao_id: Option<Id>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl CursoClassificacao {
    pub fn new(curso_id: Id, classificacao_id: Id) -> Self {
        Self {
            curso_id: Some(curso_id),
            classificacao_id: Some(classificacao_id),
            timestamps: Timestamps::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursoPreRequisito {
    pub curso_id: Option<Id>,
    pub pre_requisito_id: Option<Id>,
    #[serde(default)]
    pub obrigatorio: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl CursoPreRequisito {
    pub fn new(curso_id: Id, pre_requisito_id: Id, obrigatorio: bool) -> Self {
        Self {
            curso_id: Some(curso_id),
            pre_requisito_id: Some(pre_requisito_id),
            obrigatorio,
            timestamps: Timestamps::default(),
        }
    }
}

/// Course placed on a track, `ordem` giving its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursoTrilha {
    pub curso_id: Option<Id>,
    pub trilha_id: Option<Id>,
    pub ordem: Option<u32>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl CursoTrilha {
    pub fn new(curso_id: Id, trilha_id: Id, ordem: Option<u32>) -> Self {
        Self {
            curso_id: Some(curso_id),
            trilha_id: Some(trilha_id),
            ordem,
            timestamps: Timestamps::default(),
        }
    }
}

join_entity!(
    AlunoTurma,
    EntityKind::AlunoTurma,
    (aluno_id: "alunoId" -> EntityKind::Aluno, turma_id: "turmaId" -> EntityKind::Turma),
    ["situacao", "nota"]
);
join_entity!(
    CursoClassificacao,
    EntityKind::CursoClassificacao,
    (curso_id: "cursoId" -> EntityKind::Curso, classificacao_id: "classificacaoId" -> EntityKind::Classificacao),
    []
);
join_entity!(
    CursoPreRequisito,
    EntityKind::CursoPreRequisito,
    (curso_id: "cursoId" -> EntityKind::Curso, pre_requisito_id: "preRequisitoId" -> EntityKind::PreRequisito),
    ["obrigatorio"]
);
join_entity!(
    CursoTrilha,
    EntityKind::CursoTrilha,
    (curso_id: "cursoId" -> EntityKind::Curso, trilha_id: "trilhaId" -> EntityKind::Trilha),
    ["ordem"]
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_requires_both_ids() {
        let row = AlunoTurma::new(3, 7);
        assert_eq!(row.key(), Some(PairKey::new(3, 7)));

        let partial: AlunoTurma = serde_json::from_value(json!({"alunoId": 3})).unwrap();
        assert_eq!(partial.key(), None);
        assert_eq!(
            partial.references(),
            vec![Reference::new("alunoId", EntityKind::Aluno, 3)]
        );
    }

    #[test]
    fn test_join_keys_are_not_mutable() {
        for (fields, keys) in [
            (AlunoTurma::MUTABLE_FIELDS, ["alunoId", "turmaId"]),
            (CursoClassificacao::MUTABLE_FIELDS, ["cursoId", "classificacaoId"]),
            (CursoPreRequisito::MUTABLE_FIELDS, ["cursoId", "preRequisitoId"]),
            (CursoTrilha::MUTABLE_FIELDS, ["cursoId", "trilhaId"]),
        ] {
            for key in keys {
                assert!(!fields.contains(&key));
            }
        }
    }

    #[test]
    fn test_references_point_at_owning_kinds() {
        let row = CursoTrilha::new(1, 2, Some(1));
        let kinds: Vec<_> = row.references().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Curso, EntityKind::Trilha]);
    }
}
