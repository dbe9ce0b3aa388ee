//! Bind account operations to HTTP endpoints.
use actix_web::http::header::LOCATION;
use actix_web::web::Bytes;
use actix_web::web::Data;
use actix_web::web::Path;
use actix_web::HttpResponse;

use idp_accounts::OperationError;
use idp_context::Context;
use idp_injector::Injector;

/// Path prefix of all account endpoints.
pub const ACCOUNTS_PATH: &str = "/api/v0/accounts";

/// Create a new account.
#[actix_web::post("")]
pub async fn create(
    context: Context,
    injector: Data<Injector>,
    body: Bytes,
) -> Result<HttpResponse, OperationError> {
    let account = injector.accounts.create(&context, &body).await?;
    let location = format!("{}/{}", ACCOUNTS_PATH, account.id);
    let response = HttpResponse::Created()
        .insert_header((LOCATION, location))
        .json(account);
    Ok(response)
}

/// Delete an account.
#[actix_web::delete("/{id}")]
pub async fn delete(
    context: Context,
    injector: Data<Injector>,
    id: Path<String>,
) -> Result<HttpResponse, OperationError> {
    injector.accounts.delete(&context, &id).await?;
    Ok(HttpResponse::Accepted().finish())
}

/// Lookup an account.
#[actix_web::get("/{id}")]
pub async fn get(
    context: Context,
    injector: Data<Injector>,
    id: Path<String>,
) -> Result<HttpResponse, OperationError> {
    let account = injector.accounts.get(&context, &id).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Replace the free-form data of an account.
#[actix_web::put("/{id}/data")]
pub async fn update_data(
    context: Context,
    injector: Data<Injector>,
    id: Path<String>,
    body: Bytes,
) -> Result<HttpResponse, OperationError> {
    let account = injector.accounts.update_data(&context, &id, &body).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Change the password of an account.
#[actix_web::put("/{id}/password")]
pub async fn update_password(
    context: Context,
    injector: Data<Injector>,
    id: Path<String>,
    body: Bytes,
) -> Result<HttpResponse, OperationError> {
    let account = injector
        .accounts
        .update_password(&context, &id, &body)
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Change the username of an account.
#[actix_web::put("/{id}/username")]
pub async fn update_username(
    context: Context,
    injector: Data<Injector>,
    id: Path<String>,
    body: Bytes,
) -> Result<HttpResponse, OperationError> {
    let account = injector
        .accounts
        .update_username(&context, &id, &body)
        .await?;
    Ok(HttpResponse::Ok().json(account))
}
