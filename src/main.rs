use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines
use std::sync::Arc;
use std::time::Duration;

use halal_ads_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    store::{DocumentStore, MemoryStore, PostgresStore, TimeoutStore},
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    // Postgres when a database is configured, otherwise an in-process store
    let inner: Arc<dyn DocumentStore> = if config.database.url.is_some() {
        let pool = create_pool(&config.database)
            .await
            .expect("Failed to create database connection pool");
        run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");

        let store = Arc::new(PostgresStore::new(pool));
        store.spawn_poller(Duration::from_secs(config.store.poll_interval_secs));
        store
    } else {
        log::warn!("No database url configured, listings are kept in memory only");
        Arc::new(MemoryStore::new())
    };
    let store: Arc<dyn DocumentStore> = Arc::new(TimeoutStore::new(
        inner,
        Duration::from_millis(config.store.timeout_ms),
    ));

    let jwt_service = JwtService::new(&config.jwt.secret);

    let durations = TierDurations::from_config(&config.ads);
    let listing_service =
        ListingService::new(store.clone(), durations, config.ads.key_policy);
    let purchase_service = PurchaseService::new(
        store.clone(),
        durations,
        config.purchases.products.clone(),
    );
    let feed_service = FeedService::new(store.clone());
    feed_service.start().await;

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let served = HttpServer::new({
        let feed_service = feed_service.clone();
        move || {
            App::new()
                .wrap(Logger::default())
                .wrap(create_cors())
                .wrap(AuthMiddleware::new(jwt_service.clone()))
                .app_data(web::Data::new(listing_service.clone()))
                .app_data(web::Data::new(purchase_service.clone()))
                .app_data(web::Data::new(feed_service.clone()))
                .configure(swagger_config)
                .service(
                    web::scope("/api/v1")
                        .configure(handlers::gates_config)
                        .configure(handlers::ads_config)
                        .configure(handlers::listings_config)
                        .configure(handlers::copy_config),
                )
        }
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await;

    feed_service.stop().await;
    served
}
