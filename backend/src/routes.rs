use actix_files::Files;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use log::info;
use serde::Serialize;
use shared::classification::{CONFIDENCE_THRESHOLD, Guidance, Prediction};
use shared::waste_info::WasteTable;
use shared::{GuidanceQuery, GuidanceResponse, HealthResponse};

use crate::config::Config;
use crate::deployment;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("confidence must be between 0 and 1, got {0}")]
    InvalidConfidence(f32),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidConfidence(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/guidance").route(web::get().to(guidance)))
        .service(web::resource("/api/waste-table").route(web::get().to(waste_table)));
}

/// API routes, then the model artifacts, then the frontend bundle at the root.
pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &Config) {
    configure_api(cfg);
    cfg.service(Files::new("/my_model", &config.model_dir))
        .service(Files::new("/", &config.frontend_dir).index_file("index.html"));
}

async fn health(config: web::Data<Config>) -> HttpResponse {
    let report = deployment::check(&config.frontend_dir, &config.model_dir);
    let response = HealthResponse {
        status: if report.is_complete() { "ok" } else { "degraded" }.to_string(),
        model_ready: report.model_ready(&config.model_dir),
        missing_files: report.missing_names(),
    };
    HttpResponse::Ok().json(response)
}

async fn guidance(query: web::Query<GuidanceQuery>) -> Result<HttpResponse, ApiError> {
    let GuidanceQuery { label, confidence } = query.into_inner();
    let confidence = confidence.unwrap_or(1.0);
    if !(0.0..=1.0).contains(&confidence) {
        return Err(ApiError::InvalidConfidence(confidence));
    }

    let guidance = Guidance::from_prediction(WasteTable::builtin(), &Prediction::new(label, confidence));
    info!(
        "Guidance for {:?} ({:.2}): {}",
        guidance.label, confidence, guidance.info.title
    );
    Ok(HttpResponse::Ok().json(GuidanceResponse {
        guidance,
        threshold: CONFIDENCE_THRESHOLD,
    }))
}

async fn waste_table() -> HttpResponse {
    HttpResponse::Ok().json(WasteTable::builtin().entries())
}
