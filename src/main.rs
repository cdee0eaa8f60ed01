use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use taskgate::auth::{AuthService, PasswordHasher, RegistrationRolePolicy, TokenService};
use taskgate::routes::{self, health};
use taskgate::store::{MemoryStore, PgStore, TaskStore, UserStore};
use taskgate::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("loaded {:?}", config);

    let tokens = match TokenService::new(&config.jwt_secret, config.token_ttl()) {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => {
            log::error!("cannot start token service: {}", e);
            std::process::exit(1);
        }
    };

    let (users, tasks): (Arc<dyn UserStore>, Arc<dyn TaskStore>) = match &config.database_url {
        Some(url) => {
            let store = match PgStore::connect(url).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    log::error!("failed to connect to database: {}", e);
                    std::process::exit(1);
                }
            };
            log::info!("using PostgreSQL store");
            let users: Arc<dyn UserStore> = store.clone();
            let tasks: Arc<dyn TaskStore> = store;
            (users, tasks)
        }
        None => {
            log::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let tasks: Arc<dyn TaskStore> = store;
            (users, tasks)
        }
    };

    let role_policy = RegistrationRolePolicy::from_config(config.allow_admin_registration);
    if role_policy == RegistrationRolePolicy::SelfDeclared {
        log::warn!("registrations may request the admin role (ALLOW_ADMIN_REGISTRATION=true)");
    }
    let auth = AuthService::new(
        users,
        PasswordHasher::new(config.bcrypt_cost),
        tokens.clone(),
        role_policy,
    );

    log::info!("starting taskgate server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(auth.clone()))
            .app_data(web::Data::from(tokens.clone()))
            .app_data(web::Data::from(tasks.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(health::index)
            .service(web::scope("/api/v1").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
