//! API endpoints for the abuse protection service.
//!
//! This module provides HTTP endpoints for interacting with the service:
//! request rate-limit checks, comment spam checks and view recording.

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::AbuseCoordinator;
use crate::models::Config;

pub struct ApiState {
    pub coordinator: Arc<AbuseCoordinator>,
    pub config: Arc<Config>,
}

/// API configuration function for Actix-web
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(web::resource("/health").route(web::get().to(health_check)))
            .service(web::resource("/check-request").route(web::post().to(check_request)))
            .service(web::resource("/comments/check").route(web::post().to(check_comment)))
            .service(web::resource("/views").route(web::post().to(record_view))),
    );
}

/// Health check endpoint response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Rate limit check request
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckRequest {
    pub address: String,
}

/// Rate limit check response
#[derive(Serialize)]
struct CheckResponse {
    allowed: bool,
    message: String,
}

/// Comment spam check request
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentRequest {
    pub id: String,
    pub text: String,
}

/// Comment spam check response
#[derive(Serialize)]
struct CommentResponse {
    spam: bool,
}

/// View recording request
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewRequest {
    pub video_id: String,
    pub viewer_ip: String,
}

/// View recording response
#[derive(Serialize)]
struct ViewResponse {
    flagged: bool,
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Rate limit check endpoint
pub async fn check_request(
    state: web::Data<ApiState>,
    req: web::Json<CheckRequest>,
) -> impl Responder {
    if state.coordinator.check_request(&req.address).await {
        HttpResponse::Ok().json(CheckResponse {
            allowed: true,
            message: "Request allowed".to_string(),
        })
    } else {
        HttpResponse::TooManyRequests().json(CheckResponse {
            allowed: false,
            message: "Rate limit exceeded".to_string(),
        })
    }
}

/// Comment spam check endpoint
pub async fn check_comment(
    state: web::Data<ApiState>,
    req: web::Json<CommentRequest>,
) -> impl Responder {
    let spam = state.coordinator.handle_comment(&req.id, &req.text).await;
    HttpResponse::Ok().json(CommentResponse { spam })
}

/// View recording endpoint
pub async fn record_view(
    state: web::Data<ApiState>,
    req: web::Json<ViewRequest>,
) -> impl Responder {
    let flagged = state
        .coordinator
        .record_view(&req.video_id, &req.viewer_ip)
        .await;
    HttpResponse::Ok().json(ViewResponse { flagged })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::MockPlatformApi;
    use actix_web::{test, App};

    fn state() -> web::Data<ApiState> {
        let config = Arc::new(Config::default());
        let mut platform = MockPlatformApi::new();
        platform
            .expect_set_moderation_status()
            .returning(|_, _| Ok(()));
        let coordinator = Arc::new(AbuseCoordinator::new(&config, Arc::new(platform)));
        web::Data::new(ApiState {
            coordinator,
            config,
        })
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_check_request_allows_fresh_address() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/check-request")
            .set_json(CheckRequest {
                address: "10.0.0.1".to_string(),
            })
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_check_comment_flags_spam() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/comments/check")
            .set_json(CommentRequest {
                id: "c-1".to_string(),
                text: "Sub4Sub! Check out my channel".to_string(),
            })
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["spam"], serde_json::json!(true));
    }

    #[actix_web::test]
    async fn test_record_view() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/views")
            .set_json(ViewRequest {
                video_id: "vid-1".to_string(),
                viewer_ip: "1.2.3.4".to_string(),
            })
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["flagged"], serde_json::json!(false));
    }
}
