use crate::logic::EntityService;
use crate::model::{
    Aluno, AlunoTurma, Cargo, Classificacao, Curso, CursoClassificacao, CursoPreRequisito,
    CursoTrilha, DadosPessoa, Entity, Funcionario, Id, PreRequisito, Trilha, Turma, Usuario,
};
use crate::store::traits::Store;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;

/// Ids of the rows the seed creates, for callers that want to build on them.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSummary {
    pub cursos: Vec<Id>,
    pub trilha: Id,
    pub turma: Id,
    pub aluno: Id,
    pub funcionario: Id,
}

/// Populate an empty store with a small catalogue. Every row goes through
/// the entity services, so references are resolved and stamps assigned.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<SeedSummary> {
    let cursos = load_catalogue(store).await?;
    let trilha = load_track(store, &cursos).await?;
    let funcionario = load_staff(store).await?;
    let (turma, aluno) = load_enrolment(store, cursos[0]).await?;

    log::info!(
        "Seed data loaded: {} courses, track {}, class {}",
        cursos.len(),
        trilha,
        turma
    );

    Ok(SeedSummary {
        cursos,
        trilha,
        turma,
        aluno,
        funcionario,
    })
}

fn assigned_id<E: Entity<Key = Id>>(entity: &E) -> Result<Id> {
    entity
        .key()
        .ok_or_else(|| anyhow!("{} was saved without an id", E::KIND))
}

async fn load_catalogue<S: Store>(store: &S) -> Result<Vec<Id>> {
    let cursos = EntityService::<S, Curso>::new(store);
    let classificacoes = EntityService::<S, Classificacao>::new(store);
    let pre_requisitos = EntityService::<S, PreRequisito>::new(store);

    let mut algoritmos = Curso::new("Algoritmos");
    algoritmos.desc_curso = Some("Estruturas de dados e análise de algoritmos".to_string());
    let mut bancos = Curso::new("Bancos de Dados");
    bancos.desc_curso = Some("Modelagem relacional e SQL".to_string());

    let algoritmos = assigned_id(&cursos.create(algoritmos).await?)?;
    let bancos = assigned_id(&cursos.create(bancos).await?)?;

    let obrigatoria = classificacoes
        .create(Classificacao::new("Obrigatória"))
        .await?;
    let obrigatoria = assigned_id(&obrigatoria)?;
    let logica = pre_requisitos
        .create(PreRequisito::new("Lógica de Programação"))
        .await?;
    let logica = assigned_id(&logica)?;

    let links = EntityService::<S, CursoClassificacao>::new(store);
    links.create(CursoClassificacao::new(algoritmos, obrigatoria)).await?;
    links.create(CursoClassificacao::new(bancos, obrigatoria)).await?;

    EntityService::<S, CursoPreRequisito>::new(store)
        .create(CursoPreRequisito::new(algoritmos, logica, true))
        .await?;

    Ok(vec![algoritmos, bancos])
}

async fn load_track<S: Store>(store: &S, cursos: &[Id]) -> Result<Id> {
    let mut trilha = Trilha::new("Back-end");
    trilha.desc_trilha = Some("Fundamentos para desenvolvimento de servidores".to_string());
    let trilha = assigned_id(&EntityService::<S, Trilha>::new(store).create(trilha).await?)?;

    let etapas = EntityService::<S, CursoTrilha>::new(store);
    for (ordem, curso) in (1u32..).zip(cursos) {
        etapas.create(CursoTrilha::new(*curso, trilha, Some(ordem))).await?;
    }

    Ok(trilha)
}

async fn load_staff<S: Store>(store: &S) -> Result<Id> {
    let mut usuario = Usuario::new("marina.souza");
    usuario.email = Some("marina.souza@academia.edu".to_string());
    let usuario = assigned_id(&EntityService::<S, Usuario>::new(store).create(usuario).await?)?;

    let cargo = EntityService::<S, Cargo>::new(store)
        .create(Cargo::new("Coordenadora"))
        .await?;
    let cargo = assigned_id(&cargo)?;

    let mut dados = DadosPessoa::new("Marina Souza");
    dados.email = Some("marina.souza@academia.edu".to_string());
    let mut funcionario = Funcionario::new(dados, Some(usuario), Some(cargo));
    funcionario.data_admissao = NaiveDate::from_ymd_opt(2021, 3, 1);

    assigned_id(&EntityService::<S, Funcionario>::new(store).create(funcionario).await?)
}

async fn load_enrolment<S: Store>(store: &S, curso: Id) -> Result<(Id, Id)> {
    let mut turma = Turma::new("Algoritmos 2024.1", Some(curso));
    turma.data_inicio = NaiveDate::from_ymd_opt(2024, 2, 5);
    turma.data_fim = NaiveDate::from_ymd_opt(2024, 6, 28);
    turma.vagas = Some(40);
    let turma = assigned_id(&EntityService::<S, Turma>::new(store).create(turma).await?)?;

    let mut aluno = Aluno::new(DadosPessoa::new("Lucas Almeida"), Some("2024001".to_string()));
    aluno.data_ingresso = NaiveDate::from_ymd_opt(2024, 2, 1);
    let aluno = assigned_id(&EntityService::<S, Aluno>::new(store).create(aluno).await?)?;

    let mut matricula = AlunoTurma::new(aluno, turma);
    matricula.situacao = Some("matriculado".to_string());
    EntityService::<S, AlunoTurma>::new(store).create(matricula).await?;

    Ok((turma, aluno))
}
