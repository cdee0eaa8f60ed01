pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Mounts the API. Expects `web::Data<AuthService>`, `web::Data<TokenService>`
/// and `web::Data<dyn TaskStore>` to be registered on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid JSON payload: {}", err)).into()
}

// The only path parameter is a task id; an unparseable one cannot name a task.
fn path_error(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Task not found".into()).into()
}
