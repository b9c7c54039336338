// src/dashboard.rs
//! Dashboard controller: scored-application listing, client-side filtering,
//! score breakdown and highlights panels, and single/bulk interview invites.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::RecruiterApi;
use crate::error::ApiError;
use crate::model::{Application, HighlightsReport, ScoreBand, ScoreDetail};
use crate::retry::RetryPolicy;
use crate::view::{InviteState, Surface, TableView};
use crate::viewer::ResumeViewer;

/// Delay between consecutive invite requests in a batch, so the mail-sending
/// backend is never hit with a burst.
const INVITE_PACING: Duration = Duration::from_millis(500);

/// Context-snippet entries shown in the highlights panel are capped.
const KEYWORD_CONTEXT_LIMIT: usize = 10;

/// Missing keywords listed in the score breakdown are capped; the remainder
/// collapses into a count.
const MISSING_KEYWORD_LIMIT: usize = 20;

/// Active dashboard filter values. Setters normalize on the way in so the
/// predicate never has to.
#[derive(Debug, Clone, Default)]
pub struct DashboardFilters {
    min_score: i64,
    search: String,
}

impl DashboardFilters {
    pub fn set_min_score(&mut self, value: i64) {
        self.min_score = value.clamp(0, 100);
    }

    pub fn set_search(&mut self, value: &str) {
        self.search = value.trim().to_lowercase();
    }

    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    fn matches(&self, application: &Application) -> bool {
        let score_match = application.ats_score >= self.min_score;
        let search_match =
            self.search.is_empty() || application.app_id.to_lowercase().contains(&self.search);
        score_match && search_match
    }
}

/// Actions the dashboard can perform, dispatched through [`DashboardController::dispatch`].
#[derive(Debug, Clone)]
pub enum DashboardCommand {
    Reload,
    SetMinScore(i64),
    SetSearch(String),
    ShowScoreDetails(String),
    ShowHighlights(String),
    ToggleSection(HighlightSectionKind),
    ViewResume(String),
    ViewHighlightedResume(String),
    Invite(String),
    InviteAll,
}

/// The five independently toggleable sections of the highlights panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightSectionKind {
    Skills,
    Experience,
    Education,
    Keywords,
    Context,
}

/// Section visibility for the highlights panel. Toggling re-renders from the
/// cached report without refetching.
#[derive(Debug, Clone, Copy)]
pub struct SectionToggles {
    pub skills: bool,
    pub experience: bool,
    pub education: bool,
    pub keywords: bool,
    pub context: bool,
}

impl Default for SectionToggles {
    fn default() -> Self {
        Self {
            skills: true,
            experience: true,
            education: true,
            keywords: true,
            context: true,
        }
    }
}

impl SectionToggles {
    fn toggle(&mut self, kind: HighlightSectionKind) {
        let flag = match kind {
            HighlightSectionKind::Skills => &mut self.skills,
            HighlightSectionKind::Experience => &mut self.experience,
            HighlightSectionKind::Education => &mut self.education,
            HighlightSectionKind::Keywords => &mut self.keywords,
            HighlightSectionKind::Context => &mut self.context,
        };
        *flag = !*flag;
    }
}

pub struct DashboardController {
    api: Arc<dyn RecruiterApi>,
    surface: Arc<dyn Surface>,
    viewer: ResumeViewer,
    applications: Vec<Application>,
    shortlist: Vec<String>,
    filters: DashboardFilters,
    // One-slot cache, overwritten on every highlights open. Supports section
    // toggling without refetching.
    highlights: Option<HighlightsReport>,
    sections: SectionToggles,
    invite_policy: RetryPolicy,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn RecruiterApi>,
        surface: Arc<dyn Surface>,
        viewer: ResumeViewer,
    ) -> Self {
        Self {
            api,
            surface,
            viewer,
            applications: Vec::new(),
            shortlist: Vec::new(),
            filters: DashboardFilters::default(),
            highlights: None,
            sections: SectionToggles::default(),
            // Invite failures are terminal per attempt; the batch loop
            // carries on regardless.
            invite_policy: RetryPolicy::single_attempt(),
        }
    }

    pub fn shortlist(&self) -> &[String] {
        &self.shortlist
    }

    pub async fn dispatch(&mut self, command: DashboardCommand) {
        match command {
            DashboardCommand::Reload => self.load().await,
            DashboardCommand::SetMinScore(value) => {
                self.filters.set_min_score(value);
                self.apply_filters();
            }
            DashboardCommand::SetSearch(value) => {
                self.filters.set_search(&value);
                self.apply_filters();
            }
            DashboardCommand::ShowScoreDetails(app_id) => self.show_score_details(&app_id).await,
            DashboardCommand::ShowHighlights(app_id) => self.show_highlights(&app_id).await,
            DashboardCommand::ToggleSection(kind) => self.toggle_section(kind),
            DashboardCommand::ViewResume(app_id) => self.viewer.open_resume(&app_id).await,
            DashboardCommand::ViewHighlightedResume(app_id) => {
                self.viewer.open_highlighted(&app_id).await
            }
            DashboardCommand::Invite(app_id) => self.invite(&app_id).await,
            DashboardCommand::InviteAll => self.invite_all().await,
        }
    }

    /// Fetch the scored set and render it through the current filters.
    pub async fn load(&mut self) {
        self.surface.status("Loading and scoring applications...");
        self.applications.clear();
        self.shortlist.clear();

        match self.api.scored_applications().await {
            Ok(applications) => {
                info!("Loaded {} scored applications", applications.len());
                self.applications = applications;
                self.apply_filters();
                self.surface
                    .status(&format!("Loaded {} applications.", self.applications.len()));
            }
            Err(ApiError::Unauthorized) => {
                self.surface
                    .status("Error: Authentication failed. Check your RECRUITER_KEY.");
            }
            Err(ApiError::Network(message)) => {
                warn!("Dashboard load failed: {}", message);
                self.surface.status(
                    "Error connecting to the backend server. Ensure the server is running.",
                );
            }
            Err(err) => {
                self.surface.status(&err.to_string());
            }
        }
    }

    /// Recompute the filtered subset, replace the whole rendered table, and
    /// update the status line. Runs on every filter change, undebounced.
    pub fn apply_filters(&mut self) {
        let filtered: Vec<&Application> = self
            .applications
            .iter()
            .filter(|a| self.filters.matches(a))
            .collect();

        self.shortlist = filtered.iter().map(|a| a.app_id.clone()).collect();

        let status = filter_status(&self.filters, filtered.len(), self.applications.len());
        let table = render_applications(&filtered, &status);
        self.surface.render_table(&table);
        // The whole table is replaced, so every invite control comes back in
        // its default state.
        for app_id in &self.shortlist {
            self.surface.set_invite_state(app_id, InviteState::Idle);
        }
        self.surface.status(&status);
    }

    /// Disable-send-report cycle for one invite control. Failure is terminal
    /// per invocation; the batch loop does not inspect the outcome.
    pub async fn invite(&self, app_id: &str) {
        self.surface.set_invite_state(app_id, InviteState::Sending);
        let api = Arc::clone(&self.api);
        let result = self
            .invite_policy
            .run(|| {
                let api = Arc::clone(&api);
                let app_id = app_id.to_string();
                async move { api.invite_applicant(&app_id).await }
            })
            .await;
        match result {
            Ok(_) => {
                self.surface.set_invite_state(app_id, InviteState::Sent);
            }
            Err(err) => {
                self.surface.set_invite_state(app_id, InviteState::Failed);
                self.surface
                    .alert(&format!("Failed to send invite: {}", err));
            }
        }
    }

    /// Sequentially invite every shortlisted applicant with a fixed pacing
    /// delay after each request. Not abortable once started.
    pub async fn invite_all(&self) {
        let targets = self.shortlist.clone();
        let total = targets.len();

        if !self.surface.confirm(&format!(
            "Are you sure you want to send an interview invitation to ALL {} shortlisted applicants?",
            total
        )) {
            return;
        }

        self.surface.set_progress(&format!("Sending 0/{}...", total));

        let mut sent = 0usize;
        for app_id in &targets {
            self.invite(app_id).await;
            sent += 1;
            self.surface
                .set_progress(&format!("Sending {}/{}...", sent, total));
            tokio::time::sleep(INVITE_PACING).await;
        }

        self.surface
            .status(&format!("Batch process finished. {} invitations sent.", sent));
        self.surface.set_progress("Batch Complete!");
    }

    /// Fetch and present the score breakdown. Not cached across opens.
    pub async fn show_score_details(&self, app_id: &str) {
        match self.api.score_details(app_id).await {
            Ok(details) => {
                let body = format_score_report(&details);
                self.surface
                    .show_panel(&format!("Score Details: {}", app_id), &body);
            }
            Err(ApiError::Unauthorized) => {
                self.surface.show_panel(
                    &format!("Score Details: {}", app_id),
                    "Access denied. Check your recruiter key.",
                );
            }
            Err(err) => {
                self.surface.show_panel(
                    &format!("Score Details: {}", app_id),
                    &format!("Error loading score details: {}", err),
                );
            }
        }
    }

    /// Fetch the highlight metadata, overwrite the cache slot, and present
    /// the panel with all sections visible.
    pub async fn show_highlights(&mut self, app_id: &str) {
        match self.api.resume_highlights(app_id).await {
            Ok(report) => {
                self.sections = SectionToggles::default();
                self.render_highlights(&report);
                self.highlights = Some(report);
            }
            Err(ApiError::Unauthorized) => {
                self.surface
                    .alert("Access denied. Check your recruiter key configuration.");
            }
            Err(err) => {
                self.surface
                    .alert(&format!("Error loading highlights: {}", err));
            }
        }
    }

    /// Flip one section and re-render from the cached report. No refetch.
    pub fn toggle_section(&mut self, kind: HighlightSectionKind) {
        self.sections.toggle(kind);
        if let Some(report) = self.highlights.take() {
            self.render_highlights(&report);
            self.highlights = Some(report);
        }
    }

    fn render_highlights(&self, report: &HighlightsReport) {
        let body = format_highlights_report(report, &self.sections);
        self.surface.show_panel(
            &format!("Resume Highlights: {}", report.application_id),
            &body,
        );
    }
}

/// "Showing k/N" plus a description of every active filter.
fn filter_status(filters: &DashboardFilters, shown: usize, total: usize) -> String {
    let mut status = format!("Showing {}/{}", shown, total);
    if filters.min_score() > 0 {
        status.push_str(&format!(" (Min Score: {})", filters.min_score()));
    }
    if !filters.search().is_empty() {
        status.push_str(&format!(" (Search: \"{}\")", filters.search()));
    }
    status
}

fn render_applications(applications: &[&Application], footer: &str) -> TableView {
    TableView {
        headers: vec![
            "App ID".to_string(),
            "Job Title".to_string(),
            "ATS Score".to_string(),
            "Resume".to_string(),
        ],
        rows: applications
            .iter()
            .map(|app| {
                vec![
                    app.app_id.clone(),
                    app.job_title.clone(),
                    format!("{}% ({})", app.ats_score, ScoreBand::of(app.ats_score).label()),
                    if app.resume_file.is_some() {
                        "on file".to_string()
                    } else {
                        "missing".to_string()
                    },
                ]
            })
            .collect(),
        footer: footer.to_string(),
    }
}

/// Plain-text rendition of the score breakdown panel.
fn format_score_report(details: &ScoreDetail) -> String {
    let breakdown = &details.breakdown;
    let mut out = String::new();

    out.push_str(&format!("Application ID: {}\n", details.application_id));
    out.push_str(&format!("Job Title: {}\n", details.job_title));
    out.push_str(&format!("Overall Score: {}%\n\n", details.score));

    out.push_str("Score Breakdown:\n");
    out.push_str(&format!("  Base Score: {} points\n", breakdown.base_score));
    out.push_str(&format!(
        "  Seniority Bonus: {} points\n",
        breakdown.seniority_bonus
    ));
    out.push_str(&format!(
        "  Role Family Bonus: {} points\n",
        breakdown.role_family_bonus
    ));
    out.push_str(&format!(
        "  Keyword Match Score: {} points ({} keywords matched)\n",
        breakdown.keyword_match_score,
        details.matched_keywords.len()
    ));
    out.push_str(&format!(
        "  Work Experience Score: {} points ({} entries)\n",
        breakdown.work_experience_score, details.work_experience_count
    ));
    out.push_str(&format!(
        "  Education Relevance Score: {} points ({} entries)\n",
        breakdown.education_relevance_score, details.education_count
    ));
    out.push_str(&format!(
        "  Resume Type Bonus: {} points\n",
        breakdown.resume_type_score
    ));
    if breakdown.jitter != 0 {
        out.push_str(&format!("  Random Factor: {:+} points\n", breakdown.jitter));
    }
    out.push_str(&format!(
        "  Total Score: {}% ({})\n\n",
        details.score,
        ScoreBand::of(details.score).label()
    ));

    out.push_str(&format!(
        "Matched Keywords ({}):\n",
        details.matched_keywords.len()
    ));
    if details.matched_keywords.is_empty() {
        out.push_str("  No keywords matched\n");
    } else {
        out.push_str(&format!("  {}\n", details.matched_keywords.join(", ")));
    }

    out.push_str(&format!(
        "\nMissing Keywords ({}):\n",
        details.missing_keywords.len()
    ));
    if details.missing_keywords.is_empty() {
        out.push_str("  All relevant keywords found!\n");
    } else {
        let shown: Vec<&str> = details
            .missing_keywords
            .iter()
            .take(MISSING_KEYWORD_LIMIT)
            .map(String::as_str)
            .collect();
        out.push_str(&format!("  {}\n", shown.join(", ")));
        if details.missing_keywords.len() > MISSING_KEYWORD_LIMIT {
            out.push_str(&format!(
                "  ...and {} more\n",
                details.missing_keywords.len() - MISSING_KEYWORD_LIMIT
            ));
        }
    }

    out.push_str("\nSuggestions to Improve Score:\n");
    if details.suggestions.is_empty() {
        out.push_str("  Great job! Your resume matches well with the job requirements.\n");
    } else {
        for suggestion in &details.suggestions {
            out.push_str(&format!("  - {}\n", suggestion));
        }
    }

    out
}

/// Plain-text rendition of the highlights panel, honoring section toggles.
fn format_highlights_report(report: &HighlightsReport, sections: &SectionToggles) -> String {
    let highlights = &report.highlights;
    let mut out = String::new();

    out.push_str(&format!("Application ID: {}\n", report.application_id));
    out.push_str(&format!("Job Title: {}\n", report.job_title));
    out.push_str(&format!("ATS Score: {}%\n", report.ats_score));
    out.push_str(
        "These are the elements found in the resume that contributed to the ATS score:\n",
    );

    if sections.skills {
        out.push_str("\nSkills Found:\n");
        if highlights.skills.is_empty() {
            out.push_str("  No skills section found or no relevant keywords matched.\n");
        } else {
            for skill in &highlights.skills {
                out.push_str(&format!("  {}\n", skill.section));
                if !skill.highlighted_keywords.is_empty() {
                    out.push_str(&format!(
                        "    Matched Keywords: {}\n",
                        skill.highlighted_keywords.join(", ")
                    ));
                }
            }
        }
    }

    if sections.experience {
        out.push_str("\nExperience Found:\n");
        if highlights.experience.is_empty() {
            out.push_str("  No relevant experience section found or no matching keywords.\n");
        } else {
            for exp in &highlights.experience {
                out.push_str(&format!("  {}\n", exp.section));
                if !exp.highlighted_keywords.is_empty() {
                    out.push_str(&format!(
                        "    Matched Keywords: {}\n",
                        exp.highlighted_keywords.join(", ")
                    ));
                }
                if !exp.job_titles.is_empty() {
                    out.push_str(&format!(
                        "    Job Titles/Companies: {}\n",
                        exp.job_titles.join(", ")
                    ));
                }
            }
        }
    }

    if sections.education {
        out.push_str("\nEducation Found:\n");
        if highlights.education.is_empty() {
            out.push_str("  No relevant education section found or no matching keywords.\n");
        } else {
            for edu in &highlights.education {
                out.push_str(&format!("  {}\n", edu.section));
                if !edu.highlighted_keywords.is_empty() {
                    out.push_str(&format!(
                        "    Relevant Fields: {}\n",
                        edu.highlighted_keywords.join(", ")
                    ));
                }
                if !edu.education_terms.is_empty() {
                    out.push_str(&format!(
                        "    Education Details: {}\n",
                        edu.education_terms.join(", ")
                    ));
                }
            }
        }
    }

    if sections.keywords && !highlights.matched_keywords.is_empty() {
        out.push_str(&format!(
            "\nAll Matched Keywords ({}):\n  {}\n",
            highlights.matched_keywords.len(),
            highlights.matched_keywords.join(", ")
        ));
    }

    if sections.context && !highlights.keywords.is_empty() {
        out.push_str("\nKeywords in Context:\n");
        for kw in highlights.keywords.iter().take(KEYWORD_CONTEXT_LIMIT) {
            out.push_str(&format!("  \"{}\": ...{}...\n", kw.keyword, kw.context));
        }
    }

    out
}
