use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub services: HashMap<String, ServiceStatus>,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceStatus {
    pub status: String,
    pub details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = check_database(&state).await;

    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Degraded still answers 200 so load balancers keep routing.
    if database.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("database".to_string(), database);

    HttpResponse::Ok().json(health)
}

async fn check_database(state: &AppState) -> ServiceStatus {
    match state.store.ping().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Database reachable".to_string()),
        },
        Err(e) => {
            error!("Database health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to reach database: {}", e)),
            }
        }
    }
}
