// src/api/client.rs
//! Reqwest-backed client for the recruiting backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Method, StatusCode};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::api::types::{
    ApplicantEmailResponse, ApplicationResponse, Document, InviteResponse,
    ResumeHighlightsResponse, ScheduleField, ScheduleResponse, ScoreDetailsResponse,
    ScoredApplicationsResponse, SendEmailResponse, StatusEmailRequest,
};
use crate::api::RecruiterApi;
use crate::config::BackendConfig;
use crate::error::ApiError;
use crate::model::{Application, HighlightsReport, ScheduleEntry, ScoreDetail};

const SCORED_APPLICATIONS_ENDPOINT: &str = "/api/scored_applications";
const SCORE_DETAILS_ENDPOINT: &str = "/api/score_details";
const RESUME_HIGHLIGHTS_ENDPOINT: &str = "/api/resume_highlights";
const VIEW_RESUME_ENDPOINT: &str = "/api/view_resume";
const VIEW_RESUME_HIGHLIGHTED_ENDPOINT: &str = "/api/view_resume_highlighted";
const INVITE_APPLICANT_ENDPOINT: &str = "/api/invite_applicant";
const SCHEDULE_ENDPOINT: &str = "/api/schedule";
const SEND_STATUS_EMAIL_ENDPOINT: &str = "/api/send_status_email";
const GET_APPLICANT_EMAIL_ENDPOINT: &str = "/api/get_applicant_email";
const GET_APPLICATION_ENDPOINT: &str = "/api/get_application";

/// Path probed during base-URL resolution. Only connectivity matters; the
/// HTTP status of the probe response is ignored.
const HEALTH_PROBE_PATH: &str = "/api/score_details/health-check";

const RECRUITER_KEY_HEADER: &str = "X-Recruiter-Key";

pub struct BackendClient {
    http: reqwest::Client,
    primary: String,
    fallback: String,
    recruiter_key: String,
    resolved: OnceCell<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            primary: config.base_url.trim_end_matches('/').to_string(),
            fallback: config.fallback_url.trim_end_matches('/').to_string(),
            recruiter_key: config.recruiter_key.clone(),
            resolved: OnceCell::new(),
        })
    }

    /// Probe the primary candidate then the local fallback, accepting the
    /// first that answers at the transport level. Memoized for the session;
    /// if neither answers, the primary is kept and later calls surface
    /// their own failures.
    pub async fn resolve_base(&self) -> &str {
        self.resolved
            .get_or_init(|| async {
                for candidate in [&self.primary, &self.fallback] {
                    let url = format!("{}{}", candidate, HEALTH_PROBE_PATH);
                    match self.http.request(Method::OPTIONS, &url).send().await {
                        Ok(_) => {
                            info!("Resolved backend base URL: {}", candidate);
                            return candidate.clone();
                        }
                        Err(err) => {
                            debug!("Base candidate {} unreachable: {}", candidate, err);
                        }
                    }
                }
                warn!("No backend candidate reachable, keeping {}", self.primary);
                self.primary.clone()
            })
            .await
    }

    fn base(&self) -> &str {
        self.resolved.get().map(String::as_str).unwrap_or(&self.primary)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base(), path)
    }

    fn url_for(&self, endpoint: &str, app_id: &str) -> String {
        format!("{}{}/{}", self.base(), endpoint, urlencode(app_id))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .get(url)
            .header(RECRUITER_KEY_HEADER, &self.recruiter_key)
            .send()
            .await?;
        guard(response).await
    }

    async fn send_json(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .http
            .request(method, url)
            .header(RECRUITER_KEY_HEADER, &self.recruiter_key)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        guard(response).await
    }
}

/// Map HTTP-level failures onto the error taxonomy before any body parsing.
async fn guard(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(error_message(response).await));
    }
    if !status.is_success() {
        return Err(ApiError::Service(error_message(response).await));
    }
    Ok(response)
}

/// Pull the most useful message out of an error response: the JSON
/// `message` field when present, short body text otherwise.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(text) => {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
                    return message.to_string();
                }
            }
            if !text.is_empty() && text.len() < 500 {
                text
            } else {
                format!("HTTP {}", status)
            }
        }
        Err(_) => format!("HTTP {}", status),
    }
}

fn ensure_success(status: &str, message: Option<String>) -> Result<(), ApiError> {
    if status == "success" {
        Ok(())
    } else {
        Err(ApiError::Service(
            message.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}

/// Everything but the unreserved characters gets escaped before a value is
/// interpolated into a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one path segment. IDs are encoded defensively before
/// interpolation into the request path.
pub(crate) fn urlencode(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[async_trait]
impl RecruiterApi for BackendClient {
    async fn scored_applications(&self) -> Result<Vec<Application>, ApiError> {
        let url = self.url(SCORED_APPLICATIONS_ENDPOINT);
        debug!("Fetching scored applications: {}", url);
        let response = self.get(&url).await?;
        let envelope: ScoredApplicationsResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message)?;
        Ok(envelope.applications)
    }

    async fn score_details(&self, app_id: &str) -> Result<ScoreDetail, ApiError> {
        let url = self.url_for(SCORE_DETAILS_ENDPOINT, app_id);
        let response = self.get(&url).await?;
        let envelope: ScoreDetailsResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message)?;
        envelope
            .score_details
            .ok_or_else(|| ApiError::Service("Failed to load score details".to_string()))
    }

    async fn resume_highlights(&self, app_id: &str) -> Result<HighlightsReport, ApiError> {
        let url = self.url_for(RESUME_HIGHLIGHTS_ENDPOINT, app_id);
        let response = self.get(&url).await?;
        let envelope: ResumeHighlightsResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message.clone())?;
        Ok(envelope.into())
    }

    async fn view_resume(&self, app_id: &str) -> Result<Document, ApiError> {
        let url = self.url_for(VIEW_RESUME_ENDPOINT, app_id);
        let response = self.get(&url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?;
        debug!("Resume payload: {} bytes, type {}", bytes.len(), content_type);
        Ok(Document {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    async fn view_resume_highlighted(&self, app_id: &str) -> Result<Document, ApiError> {
        let url = self.url_for(VIEW_RESUME_HIGHLIGHTED_ENDPOINT, app_id);
        let response = self.get(&url).await?;
        let html = response.text().await?;
        Ok(Document::html(html))
    }

    async fn invite_applicant(&self, app_id: &str) -> Result<String, ApiError> {
        let url = self.url_for(INVITE_APPLICANT_ENDPOINT, app_id);
        info!("Sending interview invite: {}", url);
        let response = self.send_json(Method::POST, &url, None).await?;
        let envelope: InviteResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message.clone())?;
        Ok(envelope.message.unwrap_or_default())
    }

    async fn schedule(&self) -> Result<Vec<ScheduleEntry>, ApiError> {
        self.resolve_base().await;
        let url = self.url(SCHEDULE_ENDPOINT);
        debug!("Fetching schedule: {}", url);
        let response = self.get(&url).await?;
        let envelope: ScheduleResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message)?;
        Ok(envelope.schedule)
    }

    async fn update_schedule(&self, app_id: &str, field: &ScheduleField) -> Result<(), ApiError> {
        let url = self.url_for(SCHEDULE_ENDPOINT, app_id);
        debug!("PATCH {} {}", url, field.api_key());
        // 2xx alone is success here; the body is optional.
        self.send_json(Method::PATCH, &url, Some(&field.payload()))
            .await?;
        Ok(())
    }

    async fn send_status_email(
        &self,
        app_id: &str,
        request: &StatusEmailRequest,
    ) -> Result<String, ApiError> {
        let url = self.url_for(SEND_STATUS_EMAIL_ENDPOINT, app_id);
        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::Service(e.to_string()))?;
        let response = self.send_json(Method::POST, &url, Some(&body)).await?;
        let envelope: SendEmailResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message)?;
        Ok(envelope
            .applicant_name
            .unwrap_or_else(|| "applicant".to_string()))
    }

    async fn applicant_email(&self, app_id: &str) -> Result<String, ApiError> {
        let url = self.url_for(GET_APPLICANT_EMAIL_ENDPOINT, app_id);
        let response = self.get(&url).await?;
        let envelope: ApplicantEmailResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message)?;
        envelope.email.ok_or_else(|| {
            ApiError::Service("Could not retrieve applicant email address".to_string())
        })
    }

    async fn application(&self, app_id: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.url_for(GET_APPLICATION_ENDPOINT, app_id);
        let response = self.get(&url).await?;
        let envelope: ApplicationResponse = response.json().await?;
        ensure_success(&envelope.status, envelope.message)?;
        Ok(envelope.application_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encoding_keeps_plain_ids_and_escapes_the_rest() {
        assert_eq!(urlencode("APP-1023"), "APP-1023");
        assert_eq!(urlencode("a b"), "a%20b");
        assert_eq!(urlencode("x/y"), "x%2Fy");
    }

    #[tokio::test]
    async fn unreachable_candidates_keep_the_primary_and_memoize() {
        // Nothing listens on these loopback ports, so both probes fail at
        // the transport level.
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            fallback_url: "http://127.0.0.1:10".to_string(),
            recruiter_key: "test-key".to_string(),
            timeout_seconds: 2,
        };
        let client = BackendClient::new(&config).expect("client");

        assert_eq!(client.resolve_base().await, "http://127.0.0.1:9");
        assert_eq!(client.resolved.get().map(String::as_str), Some("http://127.0.0.1:9"));
        // Second call returns the memoized value without re-probing.
        assert_eq!(client.resolve_base().await, "http://127.0.0.1:9");
    }

    #[test]
    fn ensure_success_surfaces_server_message() {
        assert!(ensure_success("success", None).is_ok());
        let err = ensure_success("error", Some("mailer down".to_string())).unwrap_err();
        assert!(matches!(err, ApiError::Service(m) if m == "mailer down"));
        let err = ensure_success("error", None).unwrap_err();
        assert!(matches!(err, ApiError::Service(m) if m == "Unknown error"));
    }
}
