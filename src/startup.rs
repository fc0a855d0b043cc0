use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::{AdminSettings, DatabaseSettings, LifecycleSettings, Settings};
use crate::routes::{
    activity_log, create_customer, customer_history, dashboard_stats, delete_customer,
    export_customers, get_customer, health_check, list_customers, login, logout, renew_customer,
    sweep_customers, toggle_customer_status, update_customer,
};
use crate::session::SessionStore;
use crate::store::RecordStore;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let record_store = RecordStore::build(&config.storage, db_pool);
        let session_store = SessionStore::build(&config.session, &config.redis)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            record_store,
            session_store,
            config.admin.clone(),
            config.lifecycle,
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    record_store: RecordStore,
    session_store: SessionStore,
    admin: AdminSettings,
    lifecycle: LifecycleSettings,
) -> Result<Server, std::io::Error> {
    let record_store = web::Data::new(record_store);
    let session_store = web::Data::new(session_store);
    let admin = web::Data::new(admin);
    let lifecycle = web::Data::new(lifecycle);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/activity", web::get().to(activity_log))
            .service(
                web::scope("/customers")
                    .route("", web::get().to(list_customers))
                    .route("", web::post().to(create_customer))
                    // Fixed paths go before "/{id}"
                    .route("/stats", web::get().to(dashboard_stats))
                    .route("/export", web::get().to(export_customers))
                    .route("/sweep", web::post().to(sweep_customers))
                    .route("/{id}", web::get().to(get_customer))
                    .route("/{id}", web::put().to(update_customer))
                    .route("/{id}", web::delete().to(delete_customer))
                    .route("/{id}/toggle", web::post().to(toggle_customer_status))
                    .route("/{id}/renew", web::post().to(renew_customer))
                    .route("/{id}/history", web::get().to(customer_history)),
            )
            .app_data(record_store.clone())
            .app_data(session_store.clone())
            .app_data(admin.clone())
            .app_data(lifecycle.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}

