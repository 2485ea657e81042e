use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::{
    common::{parse_id, AppJson, DeleteResponse},
    AppState,
};
use crate::{
    error::AppError,
    logging::{MaskedCpf, MaskedEmail},
    models::{
        client::{validate_cpf, validate_email, CreateClientRequest},
        Client, ClientPatch, NewClient,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
}

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    pub client_id: Option<String>,
}

/// GET /clients
async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    match query.client_id.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            let id = parse_id("client", raw)?;
            let client = state.clients.get(id).await?;
            Ok(Json(client.into_iter().collect()))
        }
        None => Ok(Json(state.clients.list().await?)),
    }
}

/// GET /clients/:id
async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, AppError> {
    let id = parse_id("client", &id)?;
    let client = state
        .clients
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Client", id))?;
    Ok(Json(client))
}

/// POST /clients
async fn create_client(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let new_client = NewClient::try_from(req)?;

    if state.clients.find_id_by_cpf(&new_client.cpf).await?.is_some() {
        return Err(AppError::Conflict(
            "A client with this cpf already exists".to_string(),
        ));
    }
    if state.clients.find_id_by_email(&new_client.email).await?.is_some() {
        return Err(AppError::Conflict(
            "A client with this email already exists".to_string(),
        ));
    }

    let client = state.clients.insert(new_client).await?;
    info!(
        client_id = %client.id,
        cpf = %MaskedCpf(&client.cpf),
        email = %MaskedEmail(&client.email),
        "Client created"
    );

    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /clients/:id
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ClientPatch>,
) -> Result<Json<Client>, AppError> {
    let id = parse_id("client", &id)?;
    let current = state
        .clients
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Client", id))?;

    if let Some(cpf) = &patch.cpf {
        let cpf = validate_cpf(cpf)?;
        if cpf == current.cpf {
            return Err(AppError::Validation(
                "New cpf must differ from the current one".to_string(),
            ));
        }
        if state.clients.find_id_by_cpf(&cpf).await?.is_some() {
            return Err(AppError::Conflict(
                "Another client already uses this cpf".to_string(),
            ));
        }
    }

    if let Some(email) = &patch.email {
        let email = validate_email(email)?;
        if email == current.email {
            return Err(AppError::Validation(
                "New email must differ from the current one".to_string(),
            ));
        }
        if state.clients.find_id_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "Another client already uses this email".to_string(),
            ));
        }
    }

    let merged = patch.merge_onto(&current)?;
    let client = state
        .clients
        .update(id, merged)
        .await?
        .ok_or_else(|| AppError::not_found("Client", id))?;

    info!(
        client_id = %client.id,
        cpf = %MaskedCpf(&client.cpf),
        email = %MaskedEmail(&client.email),
        "Client updated"
    );

    Ok(Json(client))
}

/// DELETE /clients/:id
async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id("client", &id)?;
    if !state.clients.exists(id).await? {
        return Err(AppError::not_found("Client", id));
    }

    let orders = state.clients.count_orders(id).await?;
    if orders > 0 {
        return Err(AppError::Conflict(format!(
            "Client has {} order(s); delete them first",
            orders
        )));
    }

    if !state.clients.delete(id).await? {
        return Err(AppError::not_found("Client", id));
    }
    info!(client_id = %id, "Client deleted");

    Ok(DeleteResponse::new(id))
}
