// src/model.rs
//! Data shapes shared by the dashboard and schedule controllers, plus the
//! status normalization rules applied before anything is rendered.

use serde::{Deserialize, Serialize};

/// One scored application as listed on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "App_ID")]
    pub app_id: String,
    #[serde(rename = "Job_Title", default)]
    pub job_title: String,
    #[serde(rename = "ATS_Score", default)]
    pub ats_score: i64,
    #[serde(rename = "Resume_File", default)]
    pub resume_file: Option<String>,
}

/// One row of the interview schedule. `order` is the original fetch-order
/// index, stamped once at load and never recomputed; filtered views re-sort
/// by it so row order stays stable under any filter combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "App_ID")]
    pub app_id: String,
    #[serde(rename = "Interviewer", default)]
    pub interviewer: String,
    #[serde(rename = "Job_Title", default)]
    pub job_title: String,
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Phone_Status", default)]
    pub phone_status: String,
    #[serde(rename = "Inperson_Status", default)]
    pub inperson_status: String,
    #[serde(rename = "Application_Status", default)]
    pub application_status: String,
    #[serde(rename = "Rsvp_Status", default)]
    pub rsvp_status: String,
    #[serde(skip)]
    pub order: usize,
}

impl ScheduleEntry {
    pub fn is_closed(&self) -> bool {
        let status = if self.application_status.is_empty() {
            "Open"
        } else {
            self.application_status.as_str()
        };
        status.eq_ignore_ascii_case("closed")
    }
}

/// Interview stage decision, normalized from free-form casing and
/// hyphenation variants. Normalization is total: any input, including the
/// empty string, lands on one of the three variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Go,
    Pending,
    NoGo,
}

impl Stage {
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "go" => Stage::Go,
            "no go" | "nogo" | "no-go" => Stage::NoGo,
            _ => Stage::Pending,
        }
    }

    /// Display string, always one of exactly three values.
    pub fn display(&self) -> &'static str {
        match self {
            Stage::Go => "Go",
            Stage::Pending => "Pending",
            Stage::NoGo => "No go",
        }
    }

    pub fn pill(&self) -> Pill {
        match self {
            Stage::Go => Pill::Go,
            Stage::Pending => Pill::Pending,
            Stage::NoGo => Pill::NoGo,
        }
    }

    pub const OPTIONS: [Stage; 3] = [Stage::Go, Stage::Pending, Stage::NoGo];
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}

/// Visual badge classification for a stage or RSVP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pill {
    Go,
    Pending,
    NoGo,
}

/// RSVP values arrive out-of-band from the applicant's email link; anything
/// other than accepted/declined renders as pending. Returns the pill and a
/// title-cased label of the raw value.
pub fn rsvp_pill(raw: &str) -> (Pill, String) {
    let value = if raw.trim().is_empty() {
        "Pending".to_string()
    } else {
        raw.trim().to_string()
    };
    let lower = value.to_lowercase();
    let pill = match lower.as_str() {
        "accepted" => Pill::Go,
        "declined" => Pill::NoGo,
        _ => Pill::Pending,
    };
    let mut label = lower;
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    (pill, label)
}

/// Derived schedule filter buckets computed from the two stage fields.
/// These are filter predicates, not a partition: a phone "No go" with
/// in-person still pending matches both `InProgress` and `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    New,
    InProgress,
    Hired,
    Rejected,
}

impl StatusBucket {
    pub fn matches(&self, phone: Stage, inperson: Stage) -> bool {
        match self {
            StatusBucket::New => phone == Stage::Pending && inperson == Stage::Pending,
            StatusBucket::InProgress => phone != Stage::Pending && inperson == Stage::Pending,
            StatusBucket::Hired => phone == Stage::Go && inperson == Stage::Go,
            StatusBucket::Rejected => phone == Stage::NoGo || inperson == Stage::NoGo,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "new" => Some(StatusBucket::New),
            "inprogress" => Some(StatusBucket::InProgress),
            "hired" => Some(StatusBucket::Hired),
            "rejected" => Some(StatusBucket::Rejected),
            _ => None,
        }
    }
}

/// Where the application came from. The empty variant renders as the
/// "Select Source" placeholder in edit views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Unspecified,
    LinkedIn,
    Indeed,
    Naukri,
}

impl Source {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" => Some(Source::Unspecified),
            "linkedin" => Some(Source::LinkedIn),
            "indeed" => Some(Source::Indeed),
            "naukri" => Some(Source::Naukri),
            _ => None,
        }
    }

    /// Value sent to the backend and shown in the cell.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Unspecified => "",
            Source::LinkedIn => "LinkedIn",
            Source::Indeed => "Indeed",
            Source::Naukri => "Naukri",
        }
    }

    pub const OPTIONS: [Source; 4] = [
        Source::Unspecified,
        Source::LinkedIn,
        Source::Indeed,
        Source::Naukri,
    ];
}

/// Score rating bands used for both coloring and the summary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn of(score: i64) -> Self {
        if score >= 80 {
            ScoreBand::Excellent
        } else if score >= 70 {
            ScoreBand::Good
        } else if score >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Per-application score breakdown as returned by the scoring endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreDetail {
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub breakdown: ScoreBreakdown,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub work_experience_count: i64,
    #[serde(default)]
    pub education_count: i64,
    #[serde(default)]
    pub has_resume: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default)]
    pub base_score: i64,
    #[serde(default)]
    pub seniority_bonus: i64,
    #[serde(default)]
    pub role_family_bonus: i64,
    #[serde(default)]
    pub keyword_match_score: i64,
    #[serde(default)]
    pub work_experience_score: i64,
    #[serde(default)]
    pub education_relevance_score: i64,
    #[serde(default)]
    pub resume_type_score: i64,
    #[serde(default)]
    pub jitter: i64,
}

/// Highlight metadata for one resume: the sections and keywords that
/// contributed to the ATS score.
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightsReport {
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub ats_score: i64,
    #[serde(default)]
    pub highlights: Highlights,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Highlights {
    #[serde(default)]
    pub skills: Vec<HighlightSection>,
    #[serde(default)]
    pub experience: Vec<HighlightSection>,
    #[serde(default)]
    pub education: Vec<HighlightSection>,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<KeywordContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HighlightSection {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub highlighted_keywords: Vec<String>,
    #[serde(default)]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub education_terms: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordContext {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub context: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_normalization_is_total() {
        assert_eq!(Stage::normalize("GO"), Stage::Go);
        assert_eq!(Stage::normalize("go"), Stage::Go);
        assert_eq!(Stage::normalize("no go"), Stage::NoGo);
        assert_eq!(Stage::normalize("nogo"), Stage::NoGo);
        assert_eq!(Stage::normalize("No-Go"), Stage::NoGo);
        assert_eq!(Stage::normalize(""), Stage::Pending);
        assert_eq!(Stage::normalize("anything else"), Stage::Pending);
    }

    #[test]
    fn stage_normalization_is_idempotent() {
        for raw in ["GO", "no-go", "", "weird", "Pending"] {
            let once = Stage::normalize(raw);
            assert_eq!(Stage::normalize(once.display()), once);
        }
    }

    #[test]
    fn bucket_predicates_match_worked_examples() {
        assert!(StatusBucket::New.matches(Stage::Pending, Stage::Pending));
        assert!(!StatusBucket::New.matches(Stage::Go, Stage::Pending));

        assert!(StatusBucket::InProgress.matches(Stage::Go, Stage::Pending));
        assert!(!StatusBucket::InProgress.matches(Stage::Pending, Stage::Pending));

        assert!(StatusBucket::Hired.matches(Stage::Go, Stage::Go));
        assert!(!StatusBucket::Hired.matches(Stage::Go, Stage::Pending));

        assert!(StatusBucket::Rejected.matches(Stage::Go, Stage::NoGo));
        assert!(StatusBucket::Rejected.matches(Stage::NoGo, Stage::Pending));
        assert!(!StatusBucket::Rejected.matches(Stage::Go, Stage::Go));
    }

    #[test]
    fn nogo_with_pending_inperson_is_both_inprogress_and_rejected() {
        let (phone, inperson) = (Stage::NoGo, Stage::Pending);
        assert!(StatusBucket::InProgress.matches(phone, inperson));
        assert!(StatusBucket::Rejected.matches(phone, inperson));
    }

    #[test]
    fn source_parses_leniently() {
        assert_eq!(Source::parse("linkedin"), Some(Source::LinkedIn));
        assert_eq!(Source::parse("LinkedIn"), Some(Source::LinkedIn));
        assert_eq!(Source::parse(""), Some(Source::Unspecified));
        assert_eq!(Source::parse("monster"), None);
    }

    #[test]
    fn rsvp_pill_classification() {
        assert_eq!(rsvp_pill("Accepted").0, Pill::Go);
        assert_eq!(rsvp_pill("declined").0, Pill::NoGo);
        assert_eq!(rsvp_pill("").0, Pill::Pending);
        assert_eq!(rsvp_pill("Accepted").1, "Accepted");
        assert_eq!(rsvp_pill("").1, "Pending");
    }

    #[test]
    fn schedule_entry_defaults_to_open() {
        let entry: ScheduleEntry =
            serde_json::from_str(r#"{"App_ID": "APP-1"}"#).expect("parse");
        assert!(!entry.is_closed());
        assert_eq!(entry.order, 0);
    }

    #[test]
    fn score_band_thresholds() {
        assert_eq!(ScoreBand::of(85), ScoreBand::Excellent);
        assert_eq!(ScoreBand::of(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::of(72), ScoreBand::Good);
        assert_eq!(ScoreBand::of(65), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(12), ScoreBand::NeedsImprovement);
    }
}
