// src/api/mod.rs
//! Typed access to the recruiting backend API.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{Document, ScheduleField, StatusEmailRequest};

use crate::error::ApiError;
use crate::model::{Application, HighlightsReport, ScheduleEntry, ScoreDetail};
use async_trait::async_trait;

/// The backend surface the controllers depend on. The reqwest-backed
/// [`BackendClient`] is the production implementation; tests substitute
/// recording fakes.
#[async_trait]
pub trait RecruiterApi: Send + Sync {
    async fn scored_applications(&self) -> Result<Vec<Application>, ApiError>;
    async fn score_details(&self, app_id: &str) -> Result<ScoreDetail, ApiError>;
    async fn resume_highlights(&self, app_id: &str) -> Result<HighlightsReport, ApiError>;
    async fn view_resume(&self, app_id: &str) -> Result<Document, ApiError>;
    async fn view_resume_highlighted(&self, app_id: &str) -> Result<Document, ApiError>;
    async fn invite_applicant(&self, app_id: &str) -> Result<String, ApiError>;
    async fn schedule(&self) -> Result<Vec<ScheduleEntry>, ApiError>;
    async fn update_schedule(&self, app_id: &str, field: &ScheduleField) -> Result<(), ApiError>;
    async fn send_status_email(
        &self,
        app_id: &str,
        request: &StatusEmailRequest,
    ) -> Result<String, ApiError>;
    async fn applicant_email(&self, app_id: &str) -> Result<String, ApiError>;
    async fn application(&self, app_id: &str) -> Result<serde_json::Value, ApiError>;
}
