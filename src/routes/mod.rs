pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;

/// Route table: `/auth/*` is public, everything under `/api` needs a bearer token.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login),
    )
    .service(
        web::scope("/api")
            .wrap(AuthMiddleware)
            .service(health::index)
            .service(health::health)
            .service(
                web::scope("/users")
                    .service(users::create_user)
                    .service(users::get_user),
            )
            .service(
                web::scope("/tasks")
                    .service(tasks::get_tasks)
                    .service(tasks::create_task)
                    .service(tasks::get_task),
            ),
    );
}
