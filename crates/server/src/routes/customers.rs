use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::{Customer, CustomerInput};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Serialize, Debug)]
pub struct CustomerListResponse {
    pub success: bool,
    pub count: usize,
    pub customers: Vec<Customer>,
}

#[derive(Serialize, Debug)]
pub struct CustomerResponse {
    pub success: bool,
    pub customer: Customer,
}

#[derive(Serialize, Debug)]
pub struct CustomerCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub customer: Customer,
    pub total: usize,
}

/// List every stored customer
#[utoipa::path(get, path = "/customers", tag = "customers", responses((status = 200, description = "All customers", body = crate::openapi::CustomerListDoc)))]
pub async fn list_customers(State(state): State<ServerState>) -> Json<CustomerListResponse> {
    let customers = state.customers.list().await;
    info!(count = customers.len(), "listing customers");
    Json(CustomerListResponse { success: true, count: customers.len(), customers })
}

/// Fetch one customer; the id is matched case-insensitively
#[utoipa::path(
    get,
    path = "/customer/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id, any case")),
    responses(
        (status = 200, description = "Customer found", body = crate::openapi::CustomerResponseDoc),
        (status = 404, description = "No customer with that id", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_customer(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, JsonApiError> {
    let customer = state.customers.get_by_id(&id).await?;
    Ok(Json(CustomerResponse { success: true, customer }))
}

/// Register a new customer
#[utoipa::path(
    post,
    path = "/customer",
    tag = "customers",
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 201, description = "Customer added", body = crate::openapi::CustomerCreatedDoc),
        (status = 400, description = "Missing fields, duplicate id or malformed body", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Customer data could not be saved", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_customer(
    State(state): State<ServerState>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerCreatedResponse>), JsonApiError> {
    // axum's default rejection is plain text; keep the JSON error shape instead
    let Json(input) = payload
        .map_err(|rej| JsonApiError::bad_request("Invalid request body", Some(rej.body_text())))?;
    debug!(?input, "received customer");

    // validation, duplicate and storage failures map to 400/400/500 in JsonApiError
    let inserted = state.customers.insert(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CustomerCreatedResponse {
            success: true,
            message: "Customer added successfully",
            customer: inserted.customer,
            total: inserted.total,
        }),
    ))
}
