//! HTTP inbound adapter exposing the operator console's REST endpoints.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod notifications;
pub mod payloads;
pub mod records;
pub mod reference;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every operator endpoint on `cfg`.
///
/// Mount under `/api/v1`. Every handler requires the operator's bearer
/// token, `web::Data<HttpState>` and `web::Data<OperatorKey>`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use vakaalat_console::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::create_account)
        .service(accounts::delete_account)
        .service(accounts::ban_account)
        .service(records::get_record)
        .service(records::edit_record)
        .service(notifications::broadcast)
        .service(reference::reference_data);
}
