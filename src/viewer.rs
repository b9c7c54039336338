// src/viewer.rs
//! Resume viewing flows: raw bytes, highlighted HTML with raw fallback,
//! and the staged-document lifecycle shared by both.

use crate::api::RecruiterApi;
use crate::error::ApiError;
use crate::view::{DocumentSink, Surface};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// How long a staged document stays addressable after a successful open.
/// Bounds the memory held by the payload while still giving the new
/// context time to load it.
const DOCUMENT_RELEASE_DELAY: Duration = Duration::from_secs(60);

pub struct ResumeViewer {
    api: Arc<dyn RecruiterApi>,
    surface: Arc<dyn Surface>,
    sink: Arc<dyn DocumentSink>,
}

impl ResumeViewer {
    pub fn new(
        api: Arc<dyn RecruiterApi>,
        surface: Arc<dyn Surface>,
        sink: Arc<dyn DocumentSink>,
    ) -> Self {
        Self { api, surface, sink }
    }

    /// Fetch and open the raw resume. 404 gets the extended diagnostic since
    /// missing files are expected during development.
    pub async fn open_resume(&self, app_id: &str) {
        info!("Opening resume for application {}", app_id);
        match self.api.view_resume(app_id).await {
            Ok(document) => {
                if document.is_empty() {
                    self.surface.alert(&format!(
                        "Resume file is empty for Application ID: {}",
                        app_id
                    ));
                    return;
                }
                self.present(document);
            }
            Err(ApiError::Unauthorized) => {
                self.surface
                    .alert("Access denied. Check your recruiter key configuration.");
            }
            Err(ApiError::NotFound(message)) => {
                self.surface.alert(&format!(
                    "Resume not found for Application ID: {}.\n\nError: {}\n\nPlease check:\n1. Is the backend server running?\n2. Check the backend console for the detailed file listing\n3. Does the resume file exist in the resumes folder?\n4. Verify the Application ID matches the filename prefix",
                    app_id, message
                ));
            }
            Err(err) => {
                error!("Error opening resume for {}: {}", app_id, err);
                self.surface.alert(&format!(
                    "Error loading resume: {}\n\nApplication ID: {}",
                    err, app_id
                ));
            }
        }
    }

    /// Fetch and open the highlighted-HTML rendition. Authentication
    /// failures are terminal; any other failure falls back to the raw view.
    pub async fn open_highlighted(&self, app_id: &str) {
        match self.api.view_resume_highlighted(app_id).await {
            Ok(document) => self.present(document),
            Err(ApiError::Unauthorized) => {
                self.surface
                    .alert("Access denied. Check your recruiter key configuration.");
            }
            Err(err) => {
                error!("Error opening highlighted resume for {}: {}", app_id, err);
                self.surface.alert(&format!(
                    "Error: {}\n\nFalling back to regular PDF view...",
                    err
                ));
                self.open_resume(app_id).await;
            }
        }
    }

    /// Stage the document and hand it to the host. On refusal the resource
    /// is released synchronously; otherwise release is deferred so the new
    /// context has time to load it.
    fn present(&self, document: crate::api::types::Document) {
        let handle = self.sink.stage(document);
        if !self.sink.open(handle) {
            self.sink.release(handle);
            self.surface
                .alert("Popup blocked. Please allow popups for this site and try again.");
            return;
        }

        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            tokio::time::sleep(DOCUMENT_RELEASE_DELAY).await;
            sink.release(handle);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Document;
    use crate::testing::{RecordingSink, RecordingSurface, StubApi};

    fn viewer(
        api: Arc<StubApi>,
        surface: Arc<RecordingSurface>,
        sink: Arc<RecordingSink>,
    ) -> ResumeViewer {
        ResumeViewer::new(api, surface, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn successful_open_releases_after_sixty_seconds() {
        let api = Arc::new(StubApi::default());
        let surface = Arc::new(RecordingSurface::new());
        let sink = Arc::new(RecordingSink::new());
        let viewer = viewer(api, Arc::clone(&surface), Arc::clone(&sink));

        viewer.open_resume("APP-1").await;
        assert_eq!(sink.staged.lock().unwrap().len(), 1);
        assert!(sink.released_ids().is_empty());

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(sink.released_ids().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(sink.released_ids().len(), 1);
        assert!(surface.alerts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn popup_blocked_releases_synchronously_and_alerts() {
        let api = Arc::new(StubApi::default());
        let surface = Arc::new(RecordingSurface::new());
        let sink = Arc::new(RecordingSink::blocked());
        let viewer = viewer(api, Arc::clone(&surface), Arc::clone(&sink));

        viewer.open_resume("APP-1").await;

        // Released before any timer could run.
        assert_eq!(sink.released_ids().len(), 1);
        let alerts = surface.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("Popup blocked"));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_resume_alerts_without_staging() {
        let api = Arc::new(StubApi::default());
        api.resume_results.lock().unwrap().push_back(Ok(Document {
            bytes: Vec::new(),
            content_type: "application/pdf".to_string(),
        }));
        let surface = Arc::new(RecordingSurface::new());
        let sink = Arc::new(RecordingSink::new());
        let viewer = viewer(api, Arc::clone(&surface), Arc::clone(&sink));

        viewer.open_resume("APP-2").await;

        assert!(sink.staged.lock().unwrap().is_empty());
        assert!(surface.alerts()[0].contains("empty"));
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_gets_extended_diagnostic() {
        let api = Arc::new(StubApi::default());
        api.resume_results
            .lock()
            .unwrap()
            .push_back(Err(ApiError::NotFound("Resume file missing".to_string())));
        let surface = Arc::new(RecordingSurface::new());
        let sink = Arc::new(RecordingSink::new());
        let viewer = viewer(api, Arc::clone(&surface), Arc::clone(&sink));

        viewer.open_resume("APP-3").await;

        let alerts = surface.alerts();
        assert!(alerts[0].contains("Resume not found for Application ID: APP-3"));
        assert!(alerts[0].contains("Is the backend server running?"));
    }

    #[tokio::test(start_paused = true)]
    async fn highlighted_falls_back_to_raw_on_generic_failure() {
        let api = Arc::new(StubApi::default());
        api.highlighted_results
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Service("render failed".to_string())));
        let surface = Arc::new(RecordingSurface::new());
        let sink = Arc::new(RecordingSink::new());
        let viewer = viewer(Arc::clone(&api), Arc::clone(&surface), Arc::clone(&sink));

        viewer.open_highlighted("APP-4").await;

        let calls = api.calls();
        assert!(calls.contains(&"view_resume_highlighted APP-4".to_string()));
        assert!(calls.contains(&"view_resume APP-4".to_string()));
        assert!(surface.alerts()[0].contains("Falling back"));
        // The fallback succeeded and staged the raw document.
        assert_eq!(sink.staged.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn highlighted_unauthorized_never_falls_back() {
        let api = Arc::new(StubApi::default());
        api.highlighted_results
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Unauthorized));
        let surface = Arc::new(RecordingSurface::new());
        let sink = Arc::new(RecordingSink::new());
        let viewer = viewer(Arc::clone(&api), Arc::clone(&surface), Arc::clone(&sink));

        viewer.open_highlighted("APP-5").await;

        let calls = api.calls();
        assert!(!calls.iter().any(|c| c.starts_with("view_resume APP-5")));
        assert!(surface.alerts()[0].contains("Access denied"));
    }
}
