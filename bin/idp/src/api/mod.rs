//! API related tools (such as middlewares) and endpoints.
use actix_web::web::ServiceConfig;

pub mod accounts;
pub mod context;
pub mod metrics;

#[cfg(test)]
mod tests;

/// Configure an HTTP Server with all endpoints in this API module.
pub fn configure(config: &mut ServiceConfig) {
    let scope = actix_web::web::scope(self::accounts::ACCOUNTS_PATH)
        .service(self::accounts::create)
        .service(self::accounts::get)
        .service(self::accounts::delete)
        .service(self::accounts::update_username)
        .service(self::accounts::update_password)
        .service(self::accounts::update_data);
    config.service(scope).service(self::metrics::metrics);
}
