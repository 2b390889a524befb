use crate::{error::ApiError, models::AnalyzeRequest, services::AnalysisService};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use log::info;

pub fn analyze_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ai/analyze").route(web::post().to(analyze)));
}

/// Forward a prompt to the completion service and return its JSON reply.
///
/// Invalid prompts are rejected before any outbound call.
pub async fn analyze(
    request: Json<AnalyzeRequest>,
    analysis_service: web::Data<AnalysisService>,
) -> Result<HttpResponse, ApiError> {
    let prompt = request.validated_prompt()?;
    info!("Analyzing prompt ({} chars)", prompt.chars().count());

    let result = analysis_service.analyze(prompt).await?;

    Ok(HttpResponse::Ok().json(result))
}
