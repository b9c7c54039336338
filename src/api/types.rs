// src/api/types.rs

use crate::model::{Application, HighlightsReport, Highlights, ScheduleEntry, ScoreDetail, Source, Stage};
use serde::{Deserialize, Serialize};

// ===== Response envelopes =====
//
// Every JSON endpoint wraps its payload in an envelope carrying a `status`
// string; `status == "success"` is the application-level success flag and
// `message` carries the server-side explanation otherwise.

#[derive(Debug, Deserialize)]
pub struct ScoredApplicationsResponse {
    pub status: String,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub score_details: Option<ScoreDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The highlights endpoint returns its fields at the top level rather than
/// nested under a payload key.
#[derive(Debug, Deserialize)]
pub struct ResumeHighlightsResponse {
    pub status: String,
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub ats_score: i64,
    #[serde(default)]
    pub highlights: Highlights,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ResumeHighlightsResponse> for HighlightsReport {
    fn from(response: ResumeHighlightsResponse) -> Self {
        HighlightsReport {
            application_id: response.application_id,
            job_title: response.job_title,
            ats_score: response.ats_score,
            highlights: response.highlights,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InviteResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleResponse {
    pub status: String,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailResponse {
    pub status: String,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicantEmailResponse {
    pub status: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationResponse {
    pub status: String,
    #[serde(default)]
    pub application_data: serde_json::Value,
    #[serde(default)]
    pub message: Option<String>,
}

// ===== Request payloads =====

/// Body of the status/interview email POST, mirroring the mail composer
/// form fields.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEmailRequest {
    pub interview_date: String,
    pub interview_time: String,
    pub process_status: String,
    pub additional_notes: String,
}

/// A single editable schedule cell. The backend payload key differs from
/// the display property name (`Interviewer` renders, `interviewer` is
/// PATCHed), so the mapping lives here rather than in the view.
#[derive(Debug, Clone)]
pub enum ScheduleField {
    Interviewer(String),
    Source(Source),
    PhoneStatus(Stage),
    InpersonStatus(Stage),
    ApplicationStatus(String),
}

impl ScheduleField {
    pub fn api_key(&self) -> &'static str {
        match self {
            ScheduleField::Interviewer(_) => "interviewer",
            ScheduleField::Source(_) => "source",
            ScheduleField::PhoneStatus(_) => "phone_status",
            ScheduleField::InpersonStatus(_) => "inperson_status",
            ScheduleField::ApplicationStatus(_) => "application_status",
        }
    }

    pub fn api_value(&self) -> String {
        match self {
            ScheduleField::Interviewer(value) => value.clone(),
            ScheduleField::Source(source) => source.as_str().to_string(),
            ScheduleField::PhoneStatus(stage) => stage.display().to_string(),
            ScheduleField::InpersonStatus(stage) => stage.display().to_string(),
            ScheduleField::ApplicationStatus(value) => value.clone(),
        }
    }

    /// Single-field JSON body for the PATCH request.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({ self.api_key(): self.api_value() })
    }
}

/// Raw document bytes from a resume view endpoint, paired with the
/// content type the server declared.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Document {
    pub fn html(content: String) -> Self {
        Self {
            bytes: content.into_bytes(),
            content_type: "text/html".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_field_payload_uses_backend_keys() {
        let field = ScheduleField::PhoneStatus(Stage::NoGo);
        assert_eq!(field.payload(), serde_json::json!({"phone_status": "No go"}));

        let field = ScheduleField::Interviewer("Dana".to_string());
        assert_eq!(field.payload(), serde_json::json!({"interviewer": "Dana"}));

        let field = ScheduleField::Source(Source::LinkedIn);
        assert_eq!(field.payload(), serde_json::json!({"source": "LinkedIn"}));

        let field = ScheduleField::ApplicationStatus("Closed".to_string());
        assert_eq!(
            field.payload(),
            serde_json::json!({"application_status": "Closed"})
        );
    }

    #[test]
    fn highlights_response_flattens_into_report() {
        let raw = serde_json::json!({
            "status": "success",
            "application_id": "APP-9",
            "job_title": "Backend Engineer (Node.js)",
            "ats_score": 74,
            "highlights": {
                "matched_keywords": ["node", "sql"],
                "keywords": [{"keyword": "node", "context": "built node services"}]
            }
        });
        let response: ResumeHighlightsResponse = serde_json::from_value(raw).expect("parse");
        let report: HighlightsReport = response.into();
        assert_eq!(report.ats_score, 74);
        assert_eq!(report.highlights.matched_keywords.len(), 2);
        assert!(report.highlights.skills.is_empty());
    }
}
