use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{auth_events_repo, establishment_repo, group_repo, user_repo};
use crate::database::establishment_repo::NewEstablishment;
use crate::database::group_repo::NewSportGroup;
use crate::database::user_repo::NewUser;
use crate::services::validation::{
    password_strength, validate_cep, validate_cpf, validate_email, validate_phone,
    PasswordStrength,
};

const REGISTRATION_RATE_LIMIT: i64 = 5;
const REGISTRATION_RATE_WINDOW: &str = "-1 hour";

/// Flat wizard POST payload. Converted once, at the boundary, into the
/// tagged [`RegistrationRequest`]; nothing downstream looks at raw fields.
#[derive(Debug, Deserialize, Default)]
pub struct RegistrationForm {
    pub tipo: Option<String>, // apoiador|estabelecimento|grupo
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub confirma_senha: Option<String>,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub cep: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub aceite_termos: Option<String>,
    // estabelecimento
    pub razao_social: Option<String>,
    pub endereco: Option<String>,
    pub esportes: Option<String>, // comma-separated
    #[serde(default, deserialize_with = "crate::services::empty_as_none_i64")]
    pub nivel_preco: Option<i64>,
    // grupo
    pub nome_grupo: Option<String>,
    pub agenda_encontros: Option<String>,
    pub esportes_grupo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommonRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub cpf: String,
    pub phone: String,
    pub cep: String,
    pub city: String,
    pub state: String,
    pub accepted_terms: bool,
}

#[derive(Debug, Clone)]
pub struct EstablishmentRegistration {
    pub common: CommonRegistration,
    pub corporate_name: String,
    pub address: String,
    pub sports: Vec<String>,
    pub price_level: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct GroupRegistration {
    pub common: CommonRegistration,
    pub group_name: String,
    pub meeting_schedule: String,
    pub sports: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum RegistrationRequest {
    Supporter(CommonRegistration),
    Establishment(EstablishmentRegistration),
    Group(GroupRegistration),
}

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> FieldError {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum RegistrationOutcome {
    Created {
        user_id: String,
        referral_code: String,
    },
    Invalid(Vec<FieldError>),
    RateLimited,
    EmailTaken,
    CpfTaken,
}

impl RegistrationForm {
    pub fn into_request(self) -> Result<RegistrationRequest, Vec<FieldError>> {
        let kind = self.tipo.as_deref().map(str::trim).unwrap_or("");
        let common = CommonRegistration {
            name: take(self.nome),
            email: take(self.email),
            password: self.senha.unwrap_or_default(),
            password_confirmation: self.confirma_senha.unwrap_or_default(),
            cpf: take(self.cpf),
            phone: take(self.telefone),
            cep: take(self.cep),
            city: take(self.cidade),
            state: take(self.estado),
            accepted_terms: self.aceite_termos.is_some(),
        };

        match kind {
            "apoiador" => Ok(RegistrationRequest::Supporter(common)),
            "estabelecimento" => Ok(RegistrationRequest::Establishment(
                EstablishmentRegistration {
                    common,
                    corporate_name: take(self.razao_social),
                    address: take(self.endereco),
                    sports: split_sports(self.esportes.as_deref()),
                    price_level: self.nivel_preco.filter(|p| (1..=4).contains(p)),
                },
            )),
            "grupo" => Ok(RegistrationRequest::Group(GroupRegistration {
                common,
                group_name: take(self.nome_grupo),
                meeting_schedule: take(self.agenda_encontros),
                sports: split_sports(self.esportes_grupo.as_deref()),
            })),
            _ => Err(vec![FieldError::new("tipo", "Escolha um tipo de cadastro")]),
        }
    }
}

fn take(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

fn split_sports(raw: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.unwrap_or_default().split(',') {
        let t = part.trim();
        if !t.is_empty() && !out.iter().any(|s| s == t) {
            out.push(t.to_string());
        }
    }
    out
}

pub fn validate_request(request: &RegistrationRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let common = match request {
        RegistrationRequest::Supporter(c) => c,
        RegistrationRequest::Establishment(e) => &e.common,
        RegistrationRequest::Group(g) => &g.common,
    };

    if common.name.chars().count() < 3 {
        errors.push(FieldError::new("nome", "Informe seu nome completo"));
    }
    if let Err(msg) = validate_email(&common.email) {
        errors.push(FieldError::new("email", msg));
    }
    if password_strength(&common.password) == PasswordStrength::Weak {
        errors.push(FieldError::new(
            "senha",
            "Senha fraca: use 8+ caracteres com letras, números e símbolos",
        ));
    }
    if common.password != common.password_confirmation {
        errors.push(FieldError::new("confirma_senha", "As senhas não conferem"));
    }
    if let Err(msg) = validate_cpf(&common.cpf) {
        errors.push(FieldError::new("cpf", msg));
    }
    if let Err(msg) = validate_phone(&common.phone) {
        errors.push(FieldError::new("telefone", msg));
    }
    if let Err(msg) = validate_cep(&common.cep) {
        errors.push(FieldError::new("cep", msg));
    }
    if !common.accepted_terms {
        errors.push(FieldError::new("aceite_termos", "Aceite os termos de uso"));
    }

    match request {
        RegistrationRequest::Supporter(_) => {}
        RegistrationRequest::Establishment(e) => {
            if e.corporate_name.is_empty() {
                errors.push(FieldError::new("razao_social", "Informe a razão social"));
            }
            if e.sports.is_empty() {
                errors.push(FieldError::new("esportes", "Informe ao menos um esporte"));
            }
        }
        RegistrationRequest::Group(g) => {
            if g.group_name.is_empty() {
                errors.push(FieldError::new("nome_grupo", "Informe o nome do grupo"));
            }
            if g.sports.is_empty() {
                errors.push(FieldError::new(
                    "esportes_grupo",
                    "Informe ao menos um esporte",
                ));
            }
        }
    }

    errors
}

pub async fn register(
    pool: &SqlitePool,
    request: RegistrationRequest,
) -> sqlx::Result<RegistrationOutcome> {
    let errors = validate_request(&request);
    if !errors.is_empty() {
        return Ok(RegistrationOutcome::Invalid(errors));
    }

    let common = match &request {
        RegistrationRequest::Supporter(c) => c.clone(),
        RegistrationRequest::Establishment(e) => e.common.clone(),
        RegistrationRequest::Group(g) => g.common.clone(),
    };
    // Normalized by validate_request already succeeding.
    let email = validate_email(&common.email).unwrap_or_default();
    let cpf = validate_cpf(&common.cpf).unwrap_or_default();
    let phone = validate_phone(&common.phone).unwrap_or_default();
    let cep = validate_cep(&common.cep).unwrap_or_default();

    let recent =
        auth_events_repo::count_recent(pool, "registration", &email, REGISTRATION_RATE_WINDOW)
            .await?;
    if recent >= REGISTRATION_RATE_LIMIT {
        return Ok(RegistrationOutcome::RateLimited);
    }
    auth_events_repo::log_event(pool, "registration", &email).await?;

    if user_repo::email_exists(pool, &email).await? {
        return Ok(RegistrationOutcome::EmailTaken);
    }
    if user_repo::cpf_exists(pool, &cpf).await? {
        return Ok(RegistrationOutcome::CpfTaken);
    }

    let user_id = Uuid::new_v4().to_string();
    let referral_code = generate_referral_code(pool).await?;
    let role = match &request {
        RegistrationRequest::Supporter(_) => "supporter",
        RegistrationRequest::Establishment(_) => "establishment",
        RegistrationRequest::Group(_) => "group",
    };

    user_repo::insert_user(
        pool,
        NewUser {
            user_id: &user_id,
            name: &common.name,
            email: &email,
            cpf: &cpf,
            phone: &phone,
            city: some_nonempty(&common.city),
            state: some_nonempty(&common.state),
            cep: Some(&cep),
            role,
            referral_code: &referral_code,
        },
    )
    .await?;

    match &request {
        RegistrationRequest::Supporter(_) => {}
        RegistrationRequest::Establishment(e) => {
            let sports_json = serde_json::to_string(&e.sports).unwrap_or_else(|_| "[]".to_string());
            establishment_repo::insert_establishment(
                pool,
                NewEstablishment {
                    establishment_id: &Uuid::new_v4().to_string(),
                    name: &e.corporate_name,
                    city: some_nonempty(&common.city),
                    state: some_nonempty(&common.state),
                    cep: Some(&cep),
                    address: some_nonempty(&e.address),
                    sports: &sports_json,
                    price_level: e.price_level,
                    owner_user_id: &user_id,
                },
            )
            .await?;
        }
        RegistrationRequest::Group(g) => {
            let sports_json = serde_json::to_string(&g.sports).unwrap_or_else(|_| "[]".to_string());
            group_repo::insert_group(
                pool,
                NewSportGroup {
                    group_id: &Uuid::new_v4().to_string(),
                    name: &g.group_name,
                    city: some_nonempty(&common.city),
                    state: some_nonempty(&common.state),
                    meeting_schedule: some_nonempty(&g.meeting_schedule),
                    sports: &sports_json,
                    owner_user_id: &user_id,
                },
            )
            .await?;
        }
    }

    Ok(RegistrationOutcome::Created {
        user_id,
        referral_code,
    })
}

fn some_nonempty(value: &str) -> Option<&str> {
    let t = value.trim();
    if t.is_empty() {
        None
    } else {
        Some(t)
    }
}

/// 8-char referral code derived from a fresh uuid, retried on the (unlikely)
/// collision.
async fn generate_referral_code(pool: &SqlitePool) -> sqlx::Result<String> {
    for _ in 0..5 {
        let candidate: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect::<String>()
            .to_uppercase();
        if !user_repo::referral_code_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    // Full uuid as a last resort; unique by construction.
    Ok(Uuid::new_v4().simple().to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            tipo: Some("apoiador".to_string()),
            nome: Some("Maria da Silva".to_string()),
            email: Some("maria@example.com".to_string()),
            senha: Some("Senha123!".to_string()),
            confirma_senha: Some("Senha123!".to_string()),
            cpf: Some("529.982.247-25".to_string()),
            telefone: Some("(11) 98765-4321".to_string()),
            cep: Some("01310-100".to_string()),
            cidade: Some("São Paulo".to_string()),
            estado: Some("SP".to_string()),
            aceite_termos: Some("on".to_string()),
            ..RegistrationForm::default()
        }
    }

    #[test]
    fn form_maps_to_the_tagged_request() {
        let req = valid_form().into_request().unwrap();
        assert!(matches!(req, RegistrationRequest::Supporter(_)));
        assert!(validate_request(&req).is_empty());

        let mut form = valid_form();
        form.tipo = Some("estabelecimento".to_string());
        form.razao_social = Some("Arena Central Ltda".to_string());
        form.esportes = Some("Futebol, Vôlei".to_string());
        let req = form.into_request().unwrap();
        match &req {
            RegistrationRequest::Establishment(e) => {
                assert_eq!(e.sports, vec!["Futebol", "Vôlei"]);
            }
            _ => panic!("expected establishment"),
        }
        assert!(validate_request(&req).is_empty());
    }

    #[test]
    fn unknown_kind_is_rejected_at_the_boundary() {
        let mut form = valid_form();
        form.tipo = Some("patrocinador".to_string());
        assert!(form.into_request().is_err());
    }

    #[test]
    fn validation_collects_per_field_errors() {
        let mut form = valid_form();
        form.cpf = Some("111.111.111-11".to_string());
        form.senha = Some("curta".to_string());
        form.confirma_senha = Some("outra".to_string());
        form.aceite_termos = None;

        let req = form.into_request().unwrap();
        let errors = validate_request(&req);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"cpf"));
        assert!(fields.contains(&"senha"));
        assert!(fields.contains(&"confirma_senha"));
        assert!(fields.contains(&"aceite_termos"));
    }

    #[test]
    fn establishment_requires_corporate_name_and_sports() {
        let mut form = valid_form();
        form.tipo = Some("estabelecimento".to_string());
        let req = form.into_request().unwrap();
        let fields: Vec<&str> = validate_request(&req).iter().map(|e| e.field).collect();
        assert!(fields.contains(&"razao_social"));
        assert!(fields.contains(&"esportes"));
    }
}
