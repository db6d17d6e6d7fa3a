use crate::model::entity::surrogate_entity;
use crate::model::{EntityKind, Id, Reference, Referencia, Timestamps};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Field set shared by every person-like record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DadosPessoa {
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub documento: Option<String>,
}

impl DadosPessoa {
    pub fn new(nome: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pessoa {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(flatten)]
    pub dados: DadosPessoa,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Pessoa {
    pub fn new(dados: DadosPessoa) -> Self {
        Self {
            id: None,
            dados,
            timestamps: Timestamps::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(flatten)]
    pub dados: DadosPessoa,
    pub razao_social: Option<String>,
    pub cnpj: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Empresa {
    pub fn new(dados: DadosPessoa, razao_social: Option<String>) -> Self {
        Self {
            id: None,
            dados,
            razao_social,
            cnpj: None,
            timestamps: Timestamps::default(),
        }
    }
}

/// Student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aluno {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(flatten)]
    pub dados: DadosPessoa,
    pub matricula: Option<String>,
    pub data_ingresso: Option<NaiveDate>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Aluno {
    pub fn new(dados: DadosPessoa, matricula: Option<String>) -> Self {
        Self {
            id: None,
            dados,
            matricula,
            data_ingresso: None,
            timestamps: Timestamps::default(),
        }
    }
}

/// Login account an employee may be bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[serde(default)]
    pub id: Option<Id>,
    pub login: String,
    pub email: Option<String>,
    #[serde(default = "default_ativo")]
    pub ativo: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

fn default_ativo() -> bool {
    true
}

impl Usuario {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            id: None,
            login: login.into(),
            email: None,
            ativo: true,
            timestamps: Timestamps::default(),
        }
    }
}

/// Job role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    #[serde(default)]
    pub id: Option<Id>,
    pub nome_cargo: String,
    pub desc_cargo: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Cargo {
    pub fn new(nome_cargo: impl Into<String>) -> Self {
        Self {
            id: None,
            nome_cargo: nome_cargo.into(),
            desc_cargo: None,
            timestamps: Timestamps::default(),
        }
    }
}

/// Employee. `usuario` and `cargo` must point at existing rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funcionario {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(flatten)]
    pub dados: DadosPessoa,
    pub usuario: Option<Referencia>,
    pub cargo: Option<Referencia>,
    pub data_admissao: Option<NaiveDate>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Funcionario {
    pub fn new(dados: DadosPessoa, usuario: Option<Id>, cargo: Option<Id>) -> Self {
        Self {
            id: None,
            dados,
            usuario: usuario.map(Referencia::new),
            cargo: cargo.map(Referencia::new),
            data_admissao: None,
            timestamps: Timestamps::default(),
        }
    }
}

fn funcionario_references(funcionario: &Funcionario) -> Vec<Reference> {
    let usuario = funcionario
        .usuario
        .map(|r| Reference::new("usuario", EntityKind::Usuario, r.id));
    let cargo = funcionario
        .cargo
        .map(|r| Reference::new("cargo", EntityKind::Cargo, r.id));
    usuario.into_iter().chain(cargo).collect()
}

surrogate_entity!(
    Pessoa,
    EntityKind::Pessoa,
    ["nome", "email", "telefone", "documento"]
);
surrogate_entity!(
    Empresa,
    EntityKind::Empresa,
    ["nome", "email", "telefone", "documento", "razaoSocial", "cnpj"]
);
surrogate_entity!(
    Aluno,
    EntityKind::Aluno,
    ["nome", "email", "telefone", "documento", "matricula", "dataIngresso"]
);
surrogate_entity!(Usuario, EntityKind::Usuario, ["login", "email", "ativo"]);
surrogate_entity!(Cargo, EntityKind::Cargo, ["nomeCargo", "descCargo"]);
surrogate_entity!(
    Funcionario,
    EntityKind::Funcionario,
    ["nome", "email", "telefone", "documento", "usuario", "cargo", "dataAdmissao"],
    references = funcionario_references
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;
    use serde_json::json;

    #[test]
    fn test_person_fields_are_flattened() {
        let funcionario = Funcionario::new(DadosPessoa::new("Ana"), Some(99), Some(2));
        let json = serde_json::to_value(&funcionario).unwrap();

        assert_eq!(json["nome"], "Ana");
        assert_eq!(json["usuario"]["id"], 99);
        assert_eq!(json["cargo"]["id"], 2);
        assert!(json.get("dados").is_none());
        assert!(json.get("timestamps").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_deserialize_minimal_payload() {
        let aluno: Aluno = serde_json::from_value(json!({"nome": "Bruno"})).unwrap();
        assert_eq!(aluno.id, None);
        assert_eq!(aluno.dados.nome, "Bruno");
        assert_eq!(aluno.matricula, None);
        assert_eq!(aluno.timestamps, Timestamps::default());

        let usuario: Usuario = serde_json::from_value(json!({"login": "bruno"})).unwrap();
        assert!(usuario.ativo);
    }

    #[test]
    fn test_funcionario_references() {
        let funcionario = Funcionario::new(DadosPessoa::new("Ana"), Some(99), None);
        assert_eq!(
            funcionario.references(),
            vec![Reference::new("usuario", EntityKind::Usuario, 99)]
        );

        let unbound = Funcionario::new(DadosPessoa::new("Ana"), None, None);
        assert!(unbound.references().is_empty());
    }

    #[test]
    fn test_mutable_fields_never_include_identity_or_stamps() {
        for fields in [
            Pessoa::MUTABLE_FIELDS,
            Empresa::MUTABLE_FIELDS,
            Aluno::MUTABLE_FIELDS,
            Usuario::MUTABLE_FIELDS,
            Cargo::MUTABLE_FIELDS,
            Funcionario::MUTABLE_FIELDS,
        ] {
            for forbidden in ["id", "createdAt", "updatedAt"] {
                assert!(!fields.contains(&forbidden));
            }
        }
    }
}
