use actix_web::{get, web, HttpResponse};

use crate::{
    config::Config,
    models::{EnvStatus, HealthResponse},
};

#[get("/health")]
pub async fn health_check(config: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        env: EnvStatus {
            has_groq_key: config.has_groq_key(),
            has_supabase_url: config.has_supabase_url(),
            has_supabase_key: config.has_supabase_key(),
        },
    })
}
