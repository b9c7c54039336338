// src/schedule.rs
//! Schedule controller: interview tracking with debounced filtering, in-place
//! field edits saved optimistically with one retry, the status-email
//! composer, reply-by-email links, and the applicant detail split view.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Local};
use regex::Regex;
use tracing::{info, warn};

use crate::api::client::urlencode;
use crate::api::types::{ScheduleField, StatusEmailRequest};
use crate::api::RecruiterApi;
use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::model::{rsvp_pill, ScheduleEntry, Stage, StatusBucket};
use crate::retry::RetryPolicy;
use crate::view::{Surface, TableView};

/// Filter-event coalescing window. The dashboard re-renders on every
/// keystroke; the schedule view does not.
const FILTER_DEBOUNCE: Duration = Duration::from_millis(150);

/// Pause before the single save retry, covering transient network and CORS
/// preflight races.
const SAVE_RETRY_BACKOFF: Duration = Duration::from_millis(400);

/// Lifecycle filter over `Application_Status`, compared case-insensitively
/// with a default of "Open".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl ProcessFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "open" => ProcessFilter::Open,
            "closed" => ProcessFilter::Closed,
            _ => ProcessFilter::All,
        }
    }

    fn matches(&self, entry: &ScheduleEntry) -> bool {
        match self {
            ProcessFilter::All => true,
            ProcessFilter::Open => !entry.is_closed(),
            ProcessFilter::Closed => entry.is_closed(),
        }
    }
}

/// The three conjunctive schedule predicates.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilters {
    search: String,
    process: ProcessFilter,
    status: Option<StatusBucket>,
}

impl ScheduleFilters {
    fn matches(&self, entry: &ScheduleEntry) -> bool {
        if !self.search.is_empty() && !entry.app_id.to_lowercase().contains(&self.search) {
            return false;
        }
        if !self.process.matches(entry) {
            return false;
        }
        if let Some(bucket) = self.status {
            let phone = Stage::normalize(&entry.phone_status);
            let inperson = Stage::normalize(&entry.inperson_status);
            if !bucket.matches(phone, inperson) {
                return false;
            }
        }
        true
    }
}

/// Form values for the status/interview email composer.
#[derive(Debug, Clone)]
pub struct MailDraft {
    pub interview_date: String,
    pub interview_time: String,
    pub process_status: String,
    pub additional_notes: String,
}

impl MailDraft {
    /// Prefilled draft: tomorrow at 10:00, status left for the recruiter.
    pub fn prefilled() -> Self {
        let tomorrow = Local::now().date_naive() + ChronoDuration::days(1);
        Self {
            interview_date: tomorrow.format("%Y-%m-%d").to_string(),
            interview_time: "10:00".to_string(),
            process_status: String::new(),
            additional_notes: String::new(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.interview_date.is_empty()
            && !self.interview_time.is_empty()
            && !self.process_status.is_empty()
    }

    fn request(&self) -> StatusEmailRequest {
        StatusEmailRequest {
            interview_date: self.interview_date.clone(),
            interview_time: self.interview_time.clone(),
            process_status: self.process_status.clone(),
            additional_notes: self.additional_notes.clone(),
        }
    }
}

struct ScheduleState {
    entries: Vec<ScheduleEntry>,
    filters: ScheduleFilters,
    loading: bool,
}

pub struct ScheduleController {
    api: Arc<dyn RecruiterApi>,
    surface: Arc<dyn Surface>,
    state: Arc<Mutex<ScheduleState>>,
    debouncer: Debouncer,
    save_policy: RetryPolicy,
    email_policy: RetryPolicy,
}

impl ScheduleController {
    pub fn new(api: Arc<dyn RecruiterApi>, surface: Arc<dyn Surface>) -> Self {
        Self {
            api,
            surface,
            state: Arc::new(Mutex::new(ScheduleState {
                entries: Vec::new(),
                filters: ScheduleFilters::default(),
                loading: false,
            })),
            debouncer: Debouncer::new(FILTER_DEBOUNCE),
            save_policy: RetryPolicy::retry_once_after(SAVE_RETRY_BACKOFF),
            email_policy: RetryPolicy::single_attempt(),
        }
    }

    /// Fetch the schedule and stamp each row with its fetch-order index.
    /// A load already in flight makes this a no-op.
    pub async fn load(&self) {
        {
            let mut state = self.state.lock().expect("schedule state lock poisoned");
            if state.loading {
                return;
            }
            state.loading = true;
        }

        let result = self.api.schedule().await;

        let mut state = self.state.lock().expect("schedule state lock poisoned");
        state.loading = false;
        match result {
            Ok(mut entries) => {
                for (idx, entry) in entries.iter_mut().enumerate() {
                    entry.order = idx;
                }
                info!("Loaded {} schedule rows", entries.len());
                state.entries = entries;
                drop(state);
                self.render();
            }
            Err(ApiError::Unauthorized) => {
                drop(state);
                self.surface.alert("Access denied. Check your recruiter key.");
            }
            Err(ApiError::Network(message)) => {
                drop(state);
                warn!("Schedule load failed: {}", message);
                self.surface.alert(&format!(
                    "Failed to load schedule. Ensure backend is running on 127.0.0.1:5000 or localhost:5000.\n\nError: {}",
                    message
                ));
            }
            Err(err) => {
                drop(state);
                self.surface.alert(&err.to_string());
            }
        }
    }

    pub fn set_search(&self, value: &str) {
        self.state
            .lock()
            .expect("schedule state lock poisoned")
            .filters
            .search = value.trim().to_lowercase();
        self.render_debounced();
    }

    pub fn set_process_filter(&self, filter: ProcessFilter) {
        self.state
            .lock()
            .expect("schedule state lock poisoned")
            .filters
            .process = filter;
        self.render_debounced();
    }

    pub fn set_status_filter(&self, bucket: Option<StatusBucket>) {
        self.state
            .lock()
            .expect("schedule state lock poisoned")
            .filters
            .status = bucket;
        self.render_debounced();
    }

    fn render_debounced(&self) {
        let state = Arc::clone(&self.state);
        let surface = Arc::clone(&self.surface);
        self.debouncer.call(async move {
            render_now(&state, &surface);
        });
    }

    /// Immediate full re-render, used after loads and row-level actions.
    pub fn render(&self) {
        render_now(&self.state, &self.surface);
    }

    /// Optimistic in-place save: the local row is mutated first, then the
    /// PATCH runs under the retry policy. A final failure is surfaced but
    /// never rolled back; the row can diverge from backend state until the
    /// next full reload.
    pub async fn save_field(&self, app_id: &str, field: ScheduleField) {
        {
            let mut state = self.state.lock().expect("schedule state lock poisoned");
            if let Some(entry) = state.entries.iter_mut().find(|e| e.app_id == app_id) {
                apply_field(entry, &field);
            }
        }

        let api = Arc::clone(&self.api);
        let result = self
            .save_policy
            .run(|| {
                let api = Arc::clone(&api);
                let app_id = app_id.to_string();
                let field = field.clone();
                async move { api.update_schedule(&app_id, &field).await }
            })
            .await;

        if let Err(err) = result {
            warn!("Save failed for {} {}: {}", app_id, field.api_key(), err);
            self.surface
                .alert(&format!("Network error while saving. {}", err));
        }
    }

    /// Confirm-then-close. Closing is an ordinary field save; the row stays
    /// visible until the process filter hides it.
    pub async fn close_application(&self, app_id: &str) {
        if !self.surface.confirm(&format!("Close application {}?", app_id)) {
            return;
        }
        self.save_field(app_id, ScheduleField::ApplicationStatus("Closed".to_string()))
            .await;
        self.render();
    }

    /// Validate and send the composer draft.
    pub async fn send_status_email(&self, app_id: &str, draft: &MailDraft) {
        if !draft.is_complete() {
            self.surface.alert("Please fill in all required fields");
            return;
        }

        let api = Arc::clone(&self.api);
        let request = draft.request();
        let result = self
            .email_policy
            .run(|| {
                let api = Arc::clone(&api);
                let app_id = app_id.to_string();
                let request = request.clone();
                async move { api.send_status_email(&app_id, &request).await }
            })
            .await;

        match result {
            Ok(applicant_name) => {
                self.surface
                    .alert(&format!("Email sent successfully to {}!", applicant_name));
            }
            Err(ApiError::Unauthorized) => {
                self.surface.alert("Access denied. Check your recruiter key.");
            }
            Err(ApiError::Service(message)) => {
                self.surface
                    .alert(&format!("Failed to send email: {}", message));
            }
            Err(err) => {
                self.surface.alert(&format!("Error sending email: {}", err));
            }
        }
    }

    /// Look up the applicant's address and open a prefilled mailto link.
    pub async fn reply_by_email(&self, app_id: &str) {
        match self.api.applicant_email(app_id).await {
            Ok(email) => {
                let subject = urlencode(&format!(
                    "Re: Application {} - Interview Confirmation",
                    app_id
                ));
                self.surface
                    .open_link(&format!("mailto:{}?subject={}", email, subject));
            }
            Err(err) => {
                self.surface.alert(&err.to_string());
            }
        }
    }

    /// Applicant split view: summarized application record on the left,
    /// current RSVP state on the right.
    pub async fn show_applicant(&self, app_id: &str) {
        match self.api.application(app_id).await {
            Ok(data) => {
                let summary = ApplicantSummary::from_value(&data);
                let body = format!(
                    "{}\n\n{}",
                    summary.format(),
                    self.format_rsvp_pane(app_id)
                );
                self.surface
                    .show_panel(&format!("Applicant: {}", app_id), &body);
            }
            Err(err) => {
                self.surface.show_panel(
                    &format!("Applicant: {}", app_id),
                    &format!("Failed to load details: {}", err),
                );
            }
        }
    }

    /// Re-fetch the schedule and re-present the RSVP pane for one applicant.
    pub async fn refresh_rsvp(&self, app_id: &str) {
        self.load().await;
        let body = self.format_rsvp_pane(app_id);
        self.surface
            .show_panel(&format!("RSVP: {}", app_id), &body);
    }

    fn format_rsvp_pane(&self, app_id: &str) -> String {
        let state = self.state.lock().expect("schedule state lock poisoned");
        let raw = state
            .entries
            .iter()
            .find(|e| e.app_id == app_id)
            .map(|e| e.rsvp_status.clone())
            .unwrap_or_default();
        let (_, label) = rsvp_pill(&raw);
        format!(
            "RSVP: {} (current status for {})\nThis updates automatically when the applicant clicks their email link. Use Refresh to pull latest.",
            label, app_id
        )
    }
}

fn apply_field(entry: &mut ScheduleEntry, field: &ScheduleField) {
    match field {
        ScheduleField::Interviewer(value) => entry.interviewer = value.clone(),
        ScheduleField::Source(source) => entry.source = source.as_str().to_string(),
        ScheduleField::PhoneStatus(stage) => entry.phone_status = stage.display().to_string(),
        ScheduleField::InpersonStatus(stage) => {
            entry.inperson_status = stage.display().to_string()
        }
        ScheduleField::ApplicationStatus(value) => entry.application_status = value.clone(),
    }
}

/// Apply the filters and render, always re-sorting by the immutable
/// fetch-order index so presentation order is stable under any filter
/// combination.
fn render_now(state: &Mutex<ScheduleState>, surface: &Arc<dyn Surface>) {
    let (table, status) = {
        let state = state.lock().expect("schedule state lock poisoned");
        let mut rows: Vec<&ScheduleEntry> = state
            .entries
            .iter()
            .filter(|e| state.filters.matches(e))
            .collect();
        rows.sort_by_key(|e| e.order);

        let status = format!("Showing {}/{}", rows.len(), state.entries.len());
        (render_rows(&rows, &status), status)
    };
    surface.render_table(&table);
    surface.status(&status);
}

fn render_rows(rows: &[&ScheduleEntry], footer: &str) -> TableView {
    TableView {
        headers: vec![
            "#".to_string(),
            "App ID".to_string(),
            "Interviewer".to_string(),
            "Job Title".to_string(),
            "Source".to_string(),
            "Phone".to_string(),
            "In-person".to_string(),
            "RSVP".to_string(),
            "Status".to_string(),
        ],
        rows: rows
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                vec![
                    (idx + 1).to_string(),
                    entry.app_id.clone(),
                    entry.interviewer.clone(),
                    entry.job_title.clone(),
                    entry.source.clone(),
                    Stage::normalize(&entry.phone_status).display().to_string(),
                    Stage::normalize(&entry.inperson_status).display().to_string(),
                    rsvp_pill(&entry.rsvp_status).1,
                    if entry.is_closed() { "Closed" } else { "Open" }.to_string(),
                ]
            })
            .collect(),
        footer: footer.to_string(),
    }
}

/// Condensed applicant record for the split view, extracted from the raw
/// application JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantSummary {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: Option<String>,
    pub education: Vec<String>,
    pub work: Vec<String>,
}

impl ApplicantSummary {
    pub fn from_value(data: &serde_json::Value) -> Self {
        let personal = &data["personal"];
        let comm = &data["communication"];

        let full_name = ["firstName", "middleName", "lastName"]
            .iter()
            .filter_map(|key| personal[*key].as_str())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let full_name = if full_name.is_empty() {
            "N/A".to_string()
        } else {
            full_name
        };

        let text = |value: &serde_json::Value| {
            value
                .as_str()
                .filter(|s| !s.is_empty())
                .unwrap_or("N/A")
                .to_string()
        };

        let education = data["education"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .take(3)
                    .map(|e| {
                        format!(
                            "{}, {} @ {}",
                            e["degree"].as_str().unwrap_or("Degree"),
                            e["branch"].as_str().unwrap_or(""),
                            e["institution"].as_str().unwrap_or("")
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let work = data["work"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .take(3)
                    .map(|w| {
                        format!(
                            "{} @ {}",
                            w["title"].as_str().unwrap_or("Role"),
                            w["company"].as_str().unwrap_or("")
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            full_name,
            email: text(&comm["email"]),
            phone: text(&comm["phone"]),
            linkedin: find_linkedin_link(data),
            education,
            work,
        }
    }

    fn format(&self) -> String {
        let mut out = format!(
            "{}\nEmail: {}\nPhone: {}\n",
            self.full_name, self.email, self.phone
        );
        if let Some(link) = &self.linkedin {
            out.push_str(&format!("LinkedIn: {}\n", link));
        }
        if !self.education.is_empty() {
            out.push_str("\nEducation:\n");
            for line in &self.education {
                out.push_str(&format!("  - {}\n", line));
            }
        }
        if !self.work.is_empty() {
            out.push_str("\nWork:\n");
            for line in &self.work {
                out.push_str(&format!("  - {}\n", line));
            }
        }
        out
    }
}

/// Best-effort LinkedIn profile extraction: scan the serialized record for
/// URLs and keep the first profile link.
fn find_linkedin_link(data: &serde_json::Value) -> Option<String> {
    let url_pattern = Regex::new(r"https?://[\w.-]+\.[\w.-]+\S*").ok()?;
    let profile_pattern = Regex::new(r"(?i)linkedin\.com/in/").ok()?;
    let blob = data.to_string();
    let found = url_pattern
        .find_iter(&blob)
        .map(|m| m.as_str().trim_end_matches(['"', '\\']).to_string())
        .find(|url| profile_pattern.is_match(url));
    found
}
