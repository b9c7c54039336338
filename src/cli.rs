// src/cli.rs
//! Terminal front end: clap command tree plus the terminal implementations
//! of the Surface and DocumentSink seams.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::api::types::{Document, ScheduleField};
use crate::api::{BackendClient, RecruiterApi};
use crate::config::ConfigManager;
use crate::dashboard::{DashboardCommand, DashboardController};
use crate::jobs::{FileSelectionStore, JobBoard, JobPosting, RoleKey};
use crate::model::{Source, Stage, StatusBucket};
use crate::schedule::{MailDraft, ProcessFilter, ScheduleController};
use crate::view::{DocumentHandle, DocumentSink, InviteState, Surface, TableView};
use crate::viewer::ResumeViewer;

#[derive(Parser)]
#[command(name = "recruitdesk")]
#[command(about = "Recruiter console for the hiring backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Answer yes to every confirmation prompt
    #[arg(long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse job postings and record a selection
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Scored-application dashboard
    Dashboard {
        #[command(subcommand)]
        command: DashboardCliCommand,
    },
    /// Interview schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCliCommand,
    },
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List the open roles
    List,
    /// Show one posting in full
    Show { role: String },
    /// Select a role, persisting its title and flattened description
    Select { role: String },
}

#[derive(Subcommand)]
pub enum DashboardCliCommand {
    /// List scored applications with optional filters
    List {
        #[arg(long, default_value_t = 0)]
        min_score: i64,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show the score breakdown for one application
    Score { app_id: String },
    /// Show resume highlight metadata for one application
    Highlights { app_id: String },
    /// Fetch and stage the resume document
    Resume {
        app_id: String,
        /// Use the highlighted-HTML rendition
        #[arg(long)]
        highlighted: bool,
    },
    /// Send a single interview invite
    Invite { app_id: String },
    /// Invite every application matching the filters, paced
    InviteAll {
        #[arg(long, default_value_t = 0)]
        min_score: i64,
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCliCommand {
    /// List schedule rows with optional filters
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// all, open or closed
        #[arg(long, default_value = "all")]
        process: String,
        /// new, inprogress, hired or rejected
        #[arg(long)]
        status: Option<String>,
    },
    /// Update one editable field on a schedule row
    Set {
        app_id: String,
        /// interviewer, source, phone, inperson or status
        field: String,
        value: String,
    },
    /// Close an application
    Close { app_id: String },
    /// Send the status/interview email
    Mail {
        app_id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        status: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Open a prefilled reply-by-email link
    Reply { app_id: String },
    /// Show the applicant detail split view
    Applicant { app_id: String },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    let surface: Arc<dyn Surface> = Arc::new(TermSurface::new(cli.yes));

    match cli.command {
        Command::Jobs { command } => run_jobs(command, &config),
        Command::Dashboard { command } => run_dashboard(command, &config, surface).await,
        Command::Schedule { command } => run_schedule(command, &config, surface).await,
    }
}

fn run_jobs(command: JobsCommand, config: &ConfigManager) -> Result<()> {
    let board = JobBoard::new();
    match command {
        JobsCommand::List => {
            for (key, posting) in board.iter() {
                println!("{:<16} {}", key.as_str(), posting.title);
            }
        }
        JobsCommand::Show { role } => {
            print_posting(board.find(parse_role(&role)?));
        }
        JobsCommand::Select { role } => {
            let store = FileSelectionStore::new(&config.state_dir);
            let posting = board.select(parse_role(&role)?, &store)?;
            println!("Selected: {}", posting.title);
        }
    }
    Ok(())
}

async fn run_dashboard(
    command: DashboardCliCommand,
    config: &ConfigManager,
    surface: Arc<dyn Surface>,
) -> Result<()> {
    let api: Arc<dyn RecruiterApi> = Arc::new(BackendClient::new(&config.backend)?);
    let sink = Arc::new(TermSink::new(config.state_dir.join("documents")));
    let viewer = ResumeViewer::new(Arc::clone(&api), Arc::clone(&surface), sink);
    let mut dashboard = DashboardController::new(api, surface, viewer);

    match command {
        DashboardCliCommand::List { min_score, search } => {
            dashboard.dispatch(DashboardCommand::Reload).await;
            if min_score > 0 {
                dashboard.dispatch(DashboardCommand::SetMinScore(min_score)).await;
            }
            if !search.is_empty() {
                dashboard.dispatch(DashboardCommand::SetSearch(search)).await;
            }
        }
        DashboardCliCommand::Score { app_id } => {
            dashboard
                .dispatch(DashboardCommand::ShowScoreDetails(app_id))
                .await;
        }
        DashboardCliCommand::Highlights { app_id } => {
            dashboard
                .dispatch(DashboardCommand::ShowHighlights(app_id))
                .await;
        }
        DashboardCliCommand::Resume { app_id, highlighted } => {
            let command = if highlighted {
                DashboardCommand::ViewHighlightedResume(app_id)
            } else {
                DashboardCommand::ViewResume(app_id)
            };
            dashboard.dispatch(command).await;
        }
        DashboardCliCommand::Invite { app_id } => {
            dashboard.dispatch(DashboardCommand::Invite(app_id)).await;
        }
        DashboardCliCommand::InviteAll { min_score, search } => {
            dashboard.dispatch(DashboardCommand::Reload).await;
            if min_score > 0 {
                dashboard.dispatch(DashboardCommand::SetMinScore(min_score)).await;
            }
            if !search.is_empty() {
                dashboard.dispatch(DashboardCommand::SetSearch(search)).await;
            }
            dashboard.dispatch(DashboardCommand::InviteAll).await;
        }
    }
    Ok(())
}

async fn run_schedule(
    command: ScheduleCliCommand,
    config: &ConfigManager,
    surface: Arc<dyn Surface>,
) -> Result<()> {
    let api: Arc<dyn RecruiterApi> = Arc::new(BackendClient::new(&config.backend)?);
    let schedule = ScheduleController::new(api, surface);

    match command {
        ScheduleCliCommand::List {
            search,
            process,
            status,
        } => {
            schedule.load().await;
            let mut filtered = false;
            if !search.is_empty() {
                schedule.set_search(&search);
                filtered = true;
            }
            let process = ProcessFilter::parse(&process);
            if process != ProcessFilter::All {
                schedule.set_process_filter(process);
                filtered = true;
            }
            if let Some(raw) = status {
                let bucket = StatusBucket::parse(&raw)
                    .with_context(|| format!("Unknown status filter: {}", raw))?;
                schedule.set_status_filter(Some(bucket));
                filtered = true;
            }
            if filtered {
                // Let the coalesced filter render fire.
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }
        ScheduleCliCommand::Set {
            app_id,
            field,
            value,
        } => {
            schedule.load().await;
            schedule.save_field(&app_id, parse_field(&field, &value)?).await;
        }
        ScheduleCliCommand::Close { app_id } => {
            schedule.load().await;
            schedule.close_application(&app_id).await;
        }
        ScheduleCliCommand::Mail {
            app_id,
            date,
            time,
            status,
            notes,
        } => {
            let mut draft = MailDraft::prefilled();
            if let Some(date) = date {
                draft.interview_date = date;
            }
            if let Some(time) = time {
                draft.interview_time = time;
            }
            draft.process_status = status;
            draft.additional_notes = notes;
            schedule.send_status_email(&app_id, &draft).await;
        }
        ScheduleCliCommand::Reply { app_id } => {
            schedule.reply_by_email(&app_id).await;
        }
        ScheduleCliCommand::Applicant { app_id } => {
            schedule.show_applicant(&app_id).await;
        }
    }
    Ok(())
}

fn parse_role(raw: &str) -> Result<RoleKey> {
    RoleKey::parse(raw).with_context(|| {
        format!(
            "Unknown role '{}'. Valid roles: {}",
            raw,
            RoleKey::ALL
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

fn parse_field(field: &str, value: &str) -> Result<ScheduleField> {
    match field.trim().to_lowercase().as_str() {
        "interviewer" => Ok(ScheduleField::Interviewer(value.to_string())),
        "source" => {
            let source = Source::parse(value)
                .with_context(|| format!("Unknown source '{}'", value))?;
            Ok(ScheduleField::Source(source))
        }
        "phone" => Ok(ScheduleField::PhoneStatus(Stage::normalize(value))),
        "inperson" => Ok(ScheduleField::InpersonStatus(Stage::normalize(value))),
        "status" => Ok(ScheduleField::ApplicationStatus(value.to_string())),
        other => bail!(
            "Unknown field '{}'. Valid fields: interviewer, source, phone, inperson, status",
            other
        ),
    }
}

fn print_posting(posting: &JobPosting) {
    println!("{}\n", posting.title);
    println!("{}\n", posting.summary);
    println!("Eligibility:");
    for item in &posting.eligibility {
        println!("  - {}", item);
    }
    println!("\nResponsibilities:");
    for item in &posting.responsibilities {
        println!("  - {}", item);
    }
}

/// Terminal surface: plain stdout for tables and status, stderr for alerts,
/// stdin for confirmations.
pub struct TermSurface {
    assume_yes: bool,
}

impl TermSurface {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Surface for TermSurface {
    fn alert(&self, message: &str) {
        eprintln!("! {}", message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N]: ", prompt);
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }

    fn status(&self, text: &str) {
        println!("{}", text);
    }

    fn set_progress(&self, text: &str) {
        println!("{}", text);
    }

    fn set_invite_state(&self, app_id: &str, state: InviteState) {
        println!("[{}] {}", app_id, state.label());
    }

    fn render_table(&self, table: &TableView) {
        let mut widths: Vec<usize> = table.headers.iter().map(String::len).collect();
        for row in &table.rows {
            for (idx, cell) in row.iter().enumerate() {
                if idx < widths.len() {
                    widths[idx] = widths[idx].max(cell.len());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .enumerate()
                .map(|(idx, cell)| format!("{:<width$}", cell, width = widths[idx]))
                .collect::<Vec<_>>()
                .join("  ")
        };

        println!("{}", line(&table.headers));
        println!("{}", "-".repeat(widths.iter().sum::<usize>() + widths.len() * 2));
        for row in &table.rows {
            println!("{}", line(row));
        }
    }

    fn show_panel(&self, title: &str, body: &str) {
        println!("== {} ==", title);
        println!("{}", body);
    }

    fn open_link(&self, url: &str) {
        println!("Open: {}", url);
    }
}

/// Document sink that stages payloads as files under the state directory
/// and prints the path instead of opening a browsing context.
pub struct TermSink {
    dir: PathBuf,
    counter: AtomicU64,
    staged: Mutex<HashMap<u64, PathBuf>>,
}

impl TermSink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            counter: AtomicU64::new(1),
            staged: Mutex::new(HashMap::new()),
        }
    }

    fn extension(content_type: &str) -> &'static str {
        if content_type.contains("html") {
            "html"
        } else if content_type.contains("pdf") {
            "pdf"
        } else {
            "bin"
        }
    }
}

impl DocumentSink for TermSink {
    fn stage(&self, document: Document) -> DocumentHandle {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.join(format!(
            "document-{}.{}",
            id,
            Self::extension(&document.content_type)
        ));
        if let Err(err) = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, &document.bytes))
        {
            warn!("Failed to stage document {}: {}", path.display(), err);
        } else if let Ok(mut staged) = self.staged.lock() {
            staged.insert(id, path);
        }
        DocumentHandle(id)
    }

    fn open(&self, handle: DocumentHandle) -> bool {
        let staged = match self.staged.lock() {
            Ok(staged) => staged,
            Err(_) => return false,
        };
        match staged.get(&handle.0) {
            Some(path) => {
                println!("Document staged at {}", path.display());
                true
            }
            None => false,
        }
    }

    fn release(&self, handle: DocumentHandle) {
        if let Ok(mut staged) = self.staged.lock() {
            if let Some(path) = staged.remove(&handle.0) {
                if let Err(err) = std::fs::remove_file(&path) {
                    warn!("Failed to remove {}: {}", path.display(), err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_parsing_maps_cli_names_onto_payload_keys() {
        assert_eq!(
            parse_field("phone", "no-go").unwrap().api_key(),
            "phone_status"
        );
        assert_eq!(
            parse_field("phone", "no-go").unwrap().api_value(),
            "No go"
        );
        assert_eq!(
            parse_field("Interviewer", "Dana").unwrap().api_key(),
            "interviewer"
        );
        assert!(parse_field("salary", "x").is_err());
        assert!(parse_field("source", "monster").is_err());
    }

    #[test]
    fn term_sink_stages_opens_and_releases_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = TermSink::new(dir.path().join("docs"));

        let handle = sink.stage(Document::html("<html></html>".to_string()));
        assert!(sink.open(handle));
        let path = dir.path().join("docs").join("document-1.html");
        assert!(path.exists());

        sink.release(handle);
        assert!(!path.exists());
        assert!(!sink.open(handle));
    }
}
