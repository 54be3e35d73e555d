#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the firewatch application.
//!
//! Serves the REST API for the brigade's asset registry: hydrants,
//! equipment cabinets and their consumable items, tasks, teams,
//! volunteers, the maintenance log, and activities. The dashboard
//! endpoints expose per-collection stats, the rule-engine alert feed, and
//! a `GeoJSON` map export for the frontend. All records live in the
//! in-memory store; proximity and alert computations are delegated to
//! their own crates.

mod handlers;
mod map;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, Scope, middleware, web};
use firewatch_store::Store;

/// Shared application state.
pub struct AppState {
    /// The record store.
    pub store: Store,
}

/// Builds the `/api` scope with every route mounted.
///
/// Factored out of [`run_server`] so handler tests can mount the same
/// routing table against an in-memory store.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/teams", web::get().to(handlers::list_teams))
        .route("/teams", web::post().to(handlers::create_team))
        .route("/teams/{id}", web::get().to(handlers::get_team))
        .route("/teams/{id}", web::put().to(handlers::update_team))
        .route("/teams/{id}", web::delete().to(handlers::delete_team))
        .route("/volunteers", web::get().to(handlers::list_volunteers))
        .route("/volunteers", web::post().to(handlers::create_volunteer))
        .route("/volunteers/{id}", web::get().to(handlers::get_volunteer))
        .route("/volunteers/{id}", web::put().to(handlers::update_volunteer))
        .route(
            "/volunteers/{id}",
            web::delete().to(handlers::delete_volunteer),
        )
        .route("/hydrants", web::get().to(handlers::list_hydrants))
        .route("/hydrants", web::post().to(handlers::create_hydrant))
        .route("/hydrants/map", web::get().to(handlers::map_features))
        .route("/hydrants/{id}", web::get().to(handlers::get_hydrant))
        .route("/hydrants/{id}", web::put().to(handlers::update_hydrant))
        .route("/hydrants/{id}", web::delete().to(handlers::delete_hydrant))
        .route(
            "/hydrants/{id}/nearby-cabinets",
            web::get().to(handlers::nearby_cabinets),
        )
        .route(
            "/hydrants/{id}/inspection",
            web::post().to(handlers::record_inspection),
        )
        .route(
            "/equipment-cabinets",
            web::get().to(handlers::list_cabinets),
        )
        .route(
            "/equipment-cabinets",
            web::post().to(handlers::create_cabinet),
        )
        .route(
            "/equipment-cabinets/{id}",
            web::get().to(handlers::get_cabinet),
        )
        .route(
            "/equipment-cabinets/{id}",
            web::put().to(handlers::update_cabinet),
        )
        .route(
            "/equipment-cabinets/{id}",
            web::delete().to(handlers::delete_cabinet),
        )
        .route(
            "/equipment-cabinets/{id}/nearby-hydrants",
            web::get().to(handlers::nearby_hydrants),
        )
        .route(
            "/equipment-cabinets/{id}/items",
            web::get().to(handlers::list_items),
        )
        .route(
            "/equipment-cabinets/{id}/items",
            web::post().to(handlers::create_item),
        )
        .route("/items/{id}", web::put().to(handlers::update_item))
        .route("/items/{id}", web::delete().to(handlers::delete_item))
        .route("/tasks", web::get().to(handlers::list_tasks))
        .route("/tasks", web::post().to(handlers::create_task))
        .route("/tasks/{id}", web::get().to(handlers::get_task))
        .route("/tasks/{id}", web::put().to(handlers::update_task))
        .route("/tasks/{id}", web::delete().to(handlers::delete_task))
        .route("/maintenance", web::get().to(handlers::list_maintenance))
        .route("/maintenance", web::post().to(handlers::create_maintenance))
        .route("/maintenance/{id}", web::get().to(handlers::get_maintenance))
        .route(
            "/maintenance/{id}",
            web::put().to(handlers::update_maintenance),
        )
        .route(
            "/maintenance/{id}",
            web::delete().to(handlers::delete_maintenance),
        )
        .route("/activities", web::get().to(handlers::list_activities))
        .route("/activities", web::post().to(handlers::create_activity))
        .route("/activities/{id}", web::get().to(handlers::get_activity))
        .route("/activities/{id}", web::put().to(handlers::update_activity))
        .route(
            "/activities/{id}",
            web::delete().to(handlers::delete_activity),
        )
        .route("/dashboard/stats", web::get().to(handlers::dashboard_stats))
        .route(
            "/dashboard/alerts",
            web::get().to(handlers::dashboard_alerts),
        )
}

/// Starts the firewatch API server.
///
/// This is a regular async function — the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let state = web::Data::new(AppState {
        store: Store::new(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(api_scope())
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
