use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use super::{check_text, missing_fields};
use crate::error::AppError;

/// CPF in its punctuated form: 000.000.000-00
static CPF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub const MAX_NAME_LEN: usize = 40;
pub const MAX_PHONE_LEN: usize = 12;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 250;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `POST /clients`
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Validated fields of a client about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl TryFrom<CreateClientRequest> for NewClient {
    type Error = AppError;

    fn try_from(req: CreateClientRequest) -> Result<Self, Self::Error> {
        let missing: Vec<&str> = [
            ("name", &req.name),
            ("cpf", &req.cpf),
            ("phone", &req.phone),
            ("email", &req.email),
            ("address", &req.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        Ok(Self {
            name: check_text("name", req.name.as_deref().unwrap_or_default(), MAX_NAME_LEN)?,
            cpf: validate_cpf(req.cpf.as_deref().unwrap_or_default())?,
            phone: check_text("phone", req.phone.as_deref().unwrap_or_default(), MAX_PHONE_LEN)?,
            email: validate_email(req.email.as_deref().unwrap_or_default())?,
            address: check_text(
                "address",
                req.address.as_deref().unwrap_or_default(),
                MAX_ADDRESS_LEN,
            )?,
        })
    }
}

/// Body of `PUT /clients/:id`; omitted fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ClientPatch {
    /// Validate supplied fields and merge them onto `current`
    pub fn merge_onto(&self, current: &Client) -> Result<NewClient, AppError> {
        Ok(NewClient {
            name: match &self.name {
                Some(name) => check_text("name", name, MAX_NAME_LEN)?,
                None => current.name.clone(),
            },
            cpf: match &self.cpf {
                Some(cpf) => validate_cpf(cpf)?,
                None => current.cpf.clone(),
            },
            phone: match &self.phone {
                Some(phone) => check_text("phone", phone, MAX_PHONE_LEN)?,
                None => current.phone.clone(),
            },
            email: match &self.email {
                Some(email) => validate_email(email)?,
                None => current.email.clone(),
            },
            address: match &self.address {
                Some(address) => check_text("address", address, MAX_ADDRESS_LEN)?,
                None => current.address.clone(),
            },
        })
    }
}

pub fn validate_cpf(cpf: &str) -> Result<String, AppError> {
    let cpf = cpf.trim();
    if !CPF_RE.is_match(cpf) {
        return Err(AppError::Validation(
            "cpf must use the format 000.000.000-00".to_string(),
        ));
    }
    Ok(cpf.to_string())
}

/// Emails are compared case-insensitively, so they are stored lowercased
pub fn validate_email(email: &str) -> Result<String, AppError> {
    let email = check_text("email", email, MAX_EMAIL_LEN)?.to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email)
}
