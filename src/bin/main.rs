use actix_web::{middleware::Logger, web, App, HttpServer};
use arena_server::blob::AvatarStore;
use arena_server::config::settings;
use arena_server::{db, http, metrics};
use std::env;
use std::path::PathBuf;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://arena.db".into());
    let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());

    // SQLite pool + schema
    let db_pool = db::connect(&database_url)
        .await
        .expect("Failed to open database");

    // Avatar blob store
    let avatars = AvatarStore::new(
        PathBuf::from(&settings().avatar_dir),
        settings().avatar_max_bytes,
    )
    .await
    .expect("Failed to initialise avatar store");

    log::info!("listening on {server_addr}");

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(avatars.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
