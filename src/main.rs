//! Abuse Protection Service
//!
//! This is the main entry point for the abuse protection service.
//! It initializes the detection engine, spawns the periodic monitors
//! and starts the web server.

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;

use abuse_protection_service::api::{self, ApiState};
use abuse_protection_service::config;
use abuse_protection_service::core::{AbuseCoordinator, HttpPlatformClient};
use abuse_protection_service::shutdown;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    info!("Starting Abuse Protection Service...");

    // Install the Prometheus metrics recorder
    if let Err(e) = PrometheusBuilder::new().install() {
        error!("Failed to install metrics recorder: {}", e);
    }

    // Load configuration
    let config = config::load_config().expect("Failed to load configuration");
    let config = Arc::new(config);

    // Initialize the platform client
    let platform = HttpPlatformClient::new(&config.platform)
        .expect("Failed to create platform client");

    // Initialize the coordinator and its periodic monitors
    let coordinator = Arc::new(AbuseCoordinator::new(&config, Arc::new(platform)));
    let (shutdown_trigger, shutdown) = shutdown::shutdown_channel();
    let monitor_handles = coordinator.clone().spawn_monitors(shutdown);

    // Create API state
    let state = web::Data::new(ApiState {
        coordinator: coordinator.clone(),
        config: config.clone(),
    });

    // Start HTTP server
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await;

    // Tear down every periodic task before exiting
    shutdown_trigger.trigger();
    let _ = futures::future::join_all(monitor_handles).await;

    server
}
