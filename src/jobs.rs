// src/jobs.rs
//! Static job-posting board and the selection bridge that stashes the
//! chosen title and flattened description for the application flow.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const SELECTED_JOB_TITLE_KEY: &str = "selected_job_title";
pub const SELECTED_JOB_DESCRIPTION_KEY: &str = "selected_job_description";

/// Settle delay before inspecting a freshly picked resume file.
const FILE_SETTLE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoleKey {
    Frontend,
    Backend,
    Designer,
    DataScientist,
    ProductManager,
    Marketing,
}

impl RoleKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKey::Frontend => "frontend",
            RoleKey::Backend => "backend",
            RoleKey::Designer => "designer",
            RoleKey::DataScientist => "datascientist",
            RoleKey::ProductManager => "productmanager",
            RoleKey::Marketing => "marketing",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "frontend" => Some(RoleKey::Frontend),
            "backend" => Some(RoleKey::Backend),
            "designer" => Some(RoleKey::Designer),
            "datascientist" => Some(RoleKey::DataScientist),
            "productmanager" => Some(RoleKey::ProductManager),
            "marketing" => Some(RoleKey::Marketing),
            _ => None,
        }
    }

    pub const ALL: [RoleKey; 6] = [
        RoleKey::Frontend,
        RoleKey::Backend,
        RoleKey::Designer,
        RoleKey::DataScientist,
        RoleKey::ProductManager,
        RoleKey::Marketing,
    ];
}

/// One job posting. Loaded at startup, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub summary: String,
    pub eligibility: Vec<String>,
    pub responsibilities: Vec<String>,
}

impl JobPosting {
    /// Flattened description persisted alongside the title: summary,
    /// eligibility and responsibilities joined by single spaces.
    pub fn flattened_description(&self) -> String {
        let mut parts = vec![self.summary.clone()];
        parts.extend(self.eligibility.iter().cloned());
        parts.extend(self.responsibilities.iter().cloned());
        parts.join(" ")
    }
}

/// The fixed lookup table of open roles.
pub struct JobBoard {
    postings: BTreeMap<RoleKey, JobPosting>,
}

impl Default for JobBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBoard {
    pub fn new() -> Self {
        let mut postings = BTreeMap::new();

        postings.insert(RoleKey::Frontend, JobPosting {
            title: "Senior Frontend Developer".to_string(),
            summary: "Join our core engineering team to build scalable and highly responsive user interfaces using modern frameworks like React and TypeScript. You will be instrumental in setting architectural standards.".to_string(),
            eligibility: vec![
                "Bachelor's degree in Computer Science or related field.".to_string(),
                "Minimum 0-1 years of professional experience in frontend development.".to_string(),
                "Expertise in React, Redux, and modern JavaScript (ES6+).".to_string(),
                "Strong understanding of RESTful APIs and state management.".to_string(),
            ],
            responsibilities: vec![
                "Design, develop, and maintain high-quality user interfaces.".to_string(),
                "Collaborate with UX/UI designers and backend engineers.".to_string(),
                "Ensure cross-browser compatibility and optimize application performance.".to_string(),
                "Mentor junior developers and participate in code reviews.".to_string(),
            ],
        });

        postings.insert(RoleKey::Backend, JobPosting {
            title: "Backend Engineer (Node.js)".to_string(),
            summary: "We are looking for a skilled Backend Engineer to design and implement robust, high-performance APIs and microservices using Node.js and modern database technologies.".to_string(),
            eligibility: vec![
                "Master's or Bachelor's degree in Engineering or Computer Science.".to_string(),
                "0-1 years experience with Node.js and Express.".to_string(),
                "Proficiency with relational (PostgreSQL) and NoSQL (MongoDB) databases.".to_string(),
                "Experience with cloud services (AWS, Azure, or GCP).".to_string(),
            ],
            responsibilities: vec![
                "Build and maintain secure, scalable RESTful APIs.".to_string(),
                "Manage and optimize database schema and performance.".to_string(),
                "Write comprehensive unit and integration tests.".to_string(),
                "Participate in deployment and monitoring of production services.".to_string(),
            ],
        });

        postings.insert(RoleKey::Designer, JobPosting {
            title: "UX/UI Designer".to_string(),
            summary: "As a UX/UI Designer, you will be responsible for defining and delivering the best online user experience, ensuring our product is intuitive and visually appealing.".to_string(),
            eligibility: vec![
                "Proven experience as a UX/UI Designer or similar role.".to_string(),
                "Strong portfolio demonstrating user-centered design principles.".to_string(),
                "Proficiency in design tools (e.g., Figma, Sketch).".to_string(),
                "Knowledge of HTML/CSS is a plus.".to_string(),
            ],
            responsibilities: vec![
                "Create wireframes, storyboards, user flows, and site maps.".to_string(),
                "Conduct user research and evaluate user feedback.".to_string(),
                "Design graphical elements, assets, and design systems.".to_string(),
                "Work closely with product managers and engineers.".to_string(),
            ],
        });

        postings.insert(RoleKey::DataScientist, JobPosting {
            title: "Data Scientist".to_string(),
            summary: "Lead the development and implementation of advanced statistical models and machine learning algorithms to drive business strategy and product optimization.".to_string(),
            eligibility: vec![
                "Master's or Ph.D. in a quantitative field (Statistics, Math, CS).".to_string(),
                "Minimum 0-1 years of experience building and deploying ML models.".to_string(),
                "Expertise in Python (Pandas, NumPy, Scikit-learn) and SQL.".to_string(),
                "Proven ability to translate complex data into actionable insights.".to_string(),
            ],
            responsibilities: vec![
                "Design and validate predictive and prescriptive models.".to_string(),
                "Conduct A/B testing and interpret results to improve features.".to_string(),
                "Clean, transform, and manage large, complex datasets.".to_string(),
                "Present findings and recommendations to executive stakeholders.".to_string(),
            ],
        });

        postings.insert(RoleKey::ProductManager, JobPosting {
            title: "Product Manager".to_string(),
            summary: "Own the vision, strategy, and roadmap for our flagship product line. You will bridge the gap between business goals, customer needs, and technical feasibility.".to_string(),
            eligibility: vec![
                "Bachelor's degree; MBA or technical degree is a plus.".to_string(),
                "5+ years experience in B2B SaaS product management.".to_string(),
                "Strong analytical skills and experience with user story mapping.".to_string(),
                "Demonstrated ability to manage product lifecycle from conception to launch.".to_string(),
            ],
            responsibilities: vec![
                "Define product requirements and acceptance criteria.".to_string(),
                "Manage and prioritize the product backlog for the engineering team.".to_string(),
                "Engage with customers and market analysts to identify opportunities.".to_string(),
                "Track key performance indicators (KPIs) to measure product success.".to_string(),
            ],
        });

        postings.insert(RoleKey::Marketing, JobPosting {
            title: "Marketing Specialist".to_string(),
            summary: "Develop and execute multi-channel marketing campaigns focused on demand generation and brand awareness. Focus on digital channels including SEO, SEM, and social media.".to_string(),
            eligibility: vec![
                "Bachelor's degree in Marketing, Communications, or related field.".to_string(),
                "3+ years experience managing digital marketing campaigns.".to_string(),
                "Proficiency with marketing automation platforms (e.g., HubSpot, Marketo).".to_string(),
                "Knowledge of Google Analytics and SEO best practices.".to_string(),
            ],
            responsibilities: vec![
                "Create and optimize content for blogs, emails, and landing pages.".to_string(),
                "Monitor and report on campaign performance and ROI.".to_string(),
                "Manage paid advertising budgets (Google Ads, social ads).".to_string(),
                "Coordinate with sales and product teams for launch announcements.".to_string(),
            ],
        });

        Self { postings }
    }

    pub fn find(&self, key: RoleKey) -> &JobPosting {
        // All six keys are inserted in new(); the map is total over RoleKey.
        &self.postings[&key]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoleKey, &JobPosting)> {
        self.postings.iter().map(|(k, v)| (*k, v))
    }

    /// Record a selection: persists the title and flattened description for
    /// the downstream submission step, then returns the posting for display.
    pub fn select(&self, key: RoleKey, store: &dyn SelectionStore) -> Result<&JobPosting> {
        let posting = self.find(key);
        store.put(SELECTED_JOB_TITLE_KEY, &posting.title)?;
        store.put(
            SELECTED_JOB_DESCRIPTION_KEY,
            &posting.flattened_description(),
        )?;
        Ok(posting)
    }
}

/// Two-key persistence bridge standing in for browser-local storage.
pub trait SelectionStore: Send + Sync {
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// YAML-file-backed store under the configured state directory.
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(state_dir: &std::path::Path) -> Self {
        Self {
            path: state_dir.join("selection.yaml"),
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

impl SelectionStore for FileSelectionStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        let content = serde_yaml::to_string(&map).context("Failed to serialize selection")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }
}

/// MIME types accepted for resume uploads; extension check is the fallback
/// for hosts that report a blank or unexpected type.
const VALID_RESUME_MIME_TYPES: [&str; 6] = [
    "application/pdf",
    "application/x-pdf",
    "application/acrobat",
    "image/jpeg",
    "image/jpg",
    "image/pjpeg",
];

pub fn resume_file_is_valid(file_name: &str, mime_type: &str) -> bool {
    let mime = mime_type.to_lowercase();
    if VALID_RESUME_MIME_TYPES.contains(&mime.as_str()) {
        return true;
    }
    let name = file_name.to_lowercase();
    name.ends_with(".pdf") || name.ends_with(".jpg") || name.ends_with(".jpeg")
}

/// Validate a freshly picked resume file after the settle delay that lets
/// the host finish registering the file data.
pub async fn vet_resume_file(file_name: &str, mime_type: &str) -> bool {
    tokio::time::sleep(FILE_SETTLE_DELAY).await;
    resume_file_is_valid(file_name, mime_type)
}
