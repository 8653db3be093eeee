use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use horn_core::repository::InquiryRepository;
use horn_inquiry::submission::SubmissionOrchestrator;
use horn_inquiry::wizard::InquirySession;

#[derive(Clone)]
pub struct AuthSettings {
    pub admin_username: String,
    pub admin_password: String,
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn InquiryRepository>,
    /// Live wizard sessions, one per visitor working through the form.
    pub sessions: Arc<RwLock<HashMap<Uuid, InquirySession>>>,
    pub orchestrator: Arc<SubmissionOrchestrator>,
    pub auth: AuthSettings,
}
