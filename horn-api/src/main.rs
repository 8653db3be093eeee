use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use horn_api::{app, state::AuthSettings, AppState};
use horn_core::repository::InquiryRepository;
use horn_inquiry::gemini::GeminiSummaryClient;
use horn_inquiry::submission::SubmissionOrchestrator;
use horn_inquiry::summary::{MockSummaryGenerator, SummaryGenerator};
use horn_store::FileInquiryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horn_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = horn_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Horn Travel API on port {}", config.server.port);

    let repo: Arc<dyn InquiryRepository> = Arc::new(FileInquiryStore::new(&config.store.path));
    tracing::info!("Inquiry slot at {}", config.store.path);

    // Without an API key the email briefs fall back to canned text; the
    // rest of the submission flow is unaffected.
    let generator: Arc<dyn SummaryGenerator> =
        match GeminiSummaryClient::new(config.generation.clone()) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                tracing::warn!(error = %err, "generation client unavailable, using canned briefs");
                Arc::new(MockSummaryGenerator::new())
            }
        };

    let orchestrator = Arc::new(SubmissionOrchestrator::new(
        repo.clone(),
        generator,
        config.dispatch.clone(),
        config.agency.clone(),
    ));

    let app_state = AppState {
        repo,
        sessions: Arc::new(RwLock::new(HashMap::new())),
        orchestrator,
        auth: AuthSettings {
            admin_username: config.auth.admin_username.clone(),
            admin_password: config.auth.admin_password.clone(),
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
