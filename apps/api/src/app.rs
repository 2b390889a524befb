use crate::{
    config::Config,
    error::Result,
    handlers::{error_handlers, json_config},
    routes::{api_routes, static_routes},
    services::{AnalysisService, BookSearchService, GroqClient, SupabaseClient},
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;
use std::{net::TcpListener, sync::Arc};

/// Shared, read-only state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub analysis_service: web::Data<AnalysisService>,
    pub book_search_service: web::Data<BookSearchService>,
}

impl AppState {
    /// Wire the real Groq and Supabase clients from config.
    pub fn from_config(config: &Config) -> Self {
        let groq = GroqClient::new(
            &config.groq_api_url,
            &config.groq_api_key,
            &config.groq_model,
        );
        let supabase = SupabaseClient::new(
            &config.supabase_url,
            &config.supabase_key,
            &config.books_table,
        );

        Self {
            config: web::Data::new(config.clone()),
            analysis_service: web::Data::new(AnalysisService::new(Arc::new(groq))),
            book_search_service: web::Data::new(BookSearchService::new(Arc::new(supabase))),
        }
    }
}

/// Register app data and routes. Middleware is left to the caller.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let static_dir = state.config.static_dir.clone();

        cfg.app_data(json_config())
            .app_data(state.config)
            .app_data(state.analysis_service)
            .app_data(state.book_search_service)
            .service(api_routes());

        static_routes(cfg, &static_dir);
    }
}

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)
            .with_context(|| format!("Failed to bind {}", bind_address))?;
        info!("Server running on http://{}", bind_address);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let state = AppState::from_config(&self.config);
        info!("Book recommendations API is ready");

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(error_handlers())
                .wrap(cors)
                .wrap(Logger::default())
                .configure(configure(state.clone()))
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
