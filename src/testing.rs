// src/testing.rs
//! Recording fakes for the collaborator traits, shared by controller tests.

use crate::api::types::{Document, ScheduleField, StatusEmailRequest};
use crate::api::RecruiterApi;
use crate::error::ApiError;
use crate::model::{Application, HighlightsReport, ScheduleEntry, ScoreDetail};
use crate::view::{DocumentHandle, DocumentSink, InviteState, Surface, TableView};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

/// Scripted backend: per-endpoint result queues plus a timestamped call log.
/// When a queue is empty the call falls back to a benign default.
#[derive(Default)]
pub struct StubApi {
    pub call_log: Mutex<Vec<(String, Instant)>>,
    pub applications: Mutex<Vec<Application>>,
    pub schedule_rows: Mutex<Vec<ScheduleEntry>>,
    pub invite_results: Mutex<VecDeque<Result<String, ApiError>>>,
    pub update_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub resume_results: Mutex<VecDeque<Result<Document, ApiError>>>,
    pub highlighted_results: Mutex<VecDeque<Result<Document, ApiError>>>,
    pub score_results: Mutex<VecDeque<Result<ScoreDetail, ApiError>>>,
    pub highlights_results: Mutex<VecDeque<Result<HighlightsReport, ApiError>>>,
    pub email_results: Mutex<VecDeque<Result<String, ApiError>>>,
    pub send_email_results: Mutex<VecDeque<Result<String, ApiError>>>,
    pub application_results: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
}

impl StubApi {
    pub fn log(&self, entry: impl Into<String>) {
        self.call_log
            .lock()
            .unwrap()
            .push((entry.into(), Instant::now()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn call_times(&self, prefix: &str) -> Vec<Instant> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(_, at)| *at)
            .collect()
    }

    fn next<T: Default>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(T::default()))
    }
}

#[async_trait]
impl RecruiterApi for StubApi {
    async fn scored_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.log("scored_applications");
        Ok(self.applications.lock().unwrap().clone())
    }

    async fn score_details(&self, app_id: &str) -> Result<ScoreDetail, ApiError> {
        self.log(format!("score_details {}", app_id));
        self.score_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Service("no scripted score".to_string())))
    }

    async fn resume_highlights(&self, app_id: &str) -> Result<HighlightsReport, ApiError> {
        self.log(format!("resume_highlights {}", app_id));
        self.highlights_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Service("no scripted highlights".to_string())))
    }

    async fn view_resume(&self, app_id: &str) -> Result<Document, ApiError> {
        self.log(format!("view_resume {}", app_id));
        self.resume_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(Document {
                    bytes: b"%PDF-1.4".to_vec(),
                    content_type: "application/pdf".to_string(),
                })
            })
    }

    async fn view_resume_highlighted(&self, app_id: &str) -> Result<Document, ApiError> {
        self.log(format!("view_resume_highlighted {}", app_id));
        self.highlighted_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Document::html("<html></html>".to_string())))
    }

    async fn invite_applicant(&self, app_id: &str) -> Result<String, ApiError> {
        self.log(format!("invite {}", app_id));
        Self::next(&self.invite_results)
    }

    async fn schedule(&self) -> Result<Vec<ScheduleEntry>, ApiError> {
        self.log("schedule");
        Ok(self.schedule_rows.lock().unwrap().clone())
    }

    async fn update_schedule(&self, app_id: &str, field: &ScheduleField) -> Result<(), ApiError> {
        self.log(format!("update {} {}", app_id, field.api_key()));
        Self::next(&self.update_results)
    }

    async fn send_status_email(
        &self,
        app_id: &str,
        _request: &StatusEmailRequest,
    ) -> Result<String, ApiError> {
        self.log(format!("send_status_email {}", app_id));
        Self::next(&self.send_email_results)
    }

    async fn applicant_email(&self, app_id: &str) -> Result<String, ApiError> {
        self.log(format!("applicant_email {}", app_id));
        Self::next(&self.email_results)
    }

    async fn application(&self, app_id: &str) -> Result<serde_json::Value, ApiError> {
        self.log(format!("application {}", app_id));
        Self::next(&self.application_results)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Alert(String),
    Confirm(String),
    Status(String),
    Progress(String),
    Invite(String, InviteState),
    Table(TableView),
    Panel(String, String),
    Link(String),
}

/// Surface fake that records every effect and answers confirmations with a
/// preset value.
pub struct RecordingSurface {
    pub events: Mutex<Vec<SurfaceEvent>>,
    pub confirm_answer: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_answer: true,
        }
    }

    pub fn refusing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_answer: false,
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Alert(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Status(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress_labels(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Progress(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn invite_states(&self, app_id: &str) -> Vec<InviteState> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Invite(id, state) if id == app_id => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<TableView> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Table(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn panels(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Panel(title, body) => Some((title.clone(), body.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn links(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Link(u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn alert(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Alert(message.to_string()));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Confirm(prompt.to_string()));
        self.confirm_answer
    }

    fn status(&self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Status(text.to_string()));
    }

    fn set_progress(&self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Progress(text.to_string()));
    }

    fn set_invite_state(&self, app_id: &str, state: InviteState) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Invite(app_id.to_string(), state));
    }

    fn render_table(&self, table: &TableView) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Table(table.clone()));
    }

    fn show_panel(&self, title: &str, body: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Panel(title.to_string(), body.to_string()));
    }

    fn open_link(&self, url: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Link(url.to_string()));
    }
}

/// Document sink fake: records stage/open/release with paused-clock
/// timestamps; `open_result` simulates the popup-blocked case.
pub struct RecordingSink {
    counter: AtomicU64,
    pub open_result: bool,
    pub staged: Mutex<Vec<(u64, Instant)>>,
    pub released: Mutex<Vec<(u64, Instant)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
            open_result: true,
            staged: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
        }
    }

    pub fn blocked() -> Self {
        Self {
            open_result: false,
            ..Self::new()
        }
    }

    pub fn released_ids(&self) -> Vec<u64> {
        self.released.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSink for RecordingSink {
    fn stage(&self, _document: Document) -> DocumentHandle {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        self.staged.lock().unwrap().push((id, Instant::now()));
        DocumentHandle(id)
    }

    fn open(&self, _handle: DocumentHandle) -> bool {
        self.open_result
    }

    fn release(&self, handle: DocumentHandle) {
        self.released.lock().unwrap().push((handle.0, Instant::now()));
    }
}
