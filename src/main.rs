use actix_web::{middleware::Logger, web, App, HttpServer};

use warbler::config::Config;
use warbler::db::create_pool;
use warbler::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );
    let pool = create_pool(&config)
        .await
        .expect("Failed to create database pool");

    log::info!("Database connection established");

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::no_cache_headers())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .configure(routes::configure)
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await
}

