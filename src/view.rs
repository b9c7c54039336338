// src/view.rs
//! Seam between controller logic and the host environment. Controllers only
//! emit effects through these traits, so filter/format/state logic is
//! testable with recording fakes.

use crate::api::types::Document;

/// User-facing effects: alerts, confirmations, status lines, table output
/// and per-control state. The binary installs a terminal implementation.
pub trait Surface: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, prompt: &str) -> bool;
    /// Loading/count label updates ("Loaded 12 applications.", "Showing 3/12").
    fn status(&self, text: &str);
    /// Bulk-invite progress label ("Sending 2/5...").
    fn set_progress(&self, text: &str);
    fn set_invite_state(&self, app_id: &str, state: InviteState);
    fn render_table(&self, table: &TableView);
    /// Modal-style content: score breakdowns, highlight reports, applicant
    /// detail panes.
    fn show_panel(&self, title: &str, body: &str);
    /// Navigate to an external link (mailto: for reply-by-email).
    fn open_link(&self, url: &str);
}

/// Lifecycle of a single invite control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteState {
    Idle,
    Sending,
    Sent,
    Failed,
}

impl InviteState {
    pub fn label(&self) -> &'static str {
        match self {
            InviteState::Idle => "Send Invite 📧",
            InviteState::Sending => "Sending...",
            InviteState::Sent => "Sent! ✅",
            InviteState::Failed => "Failed ❌",
        }
    }
}

/// A fully materialized table: the render pipeline replaces the whole thing
/// on every filter change rather than diffing rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: String,
}

/// Opaque reference to a staged document held by a [`DocumentSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(pub u64);

/// Open-in-new-context abstraction for resume payloads. `stage` materializes
/// the document as an addressable resource, `open` asks the host to show it
/// (false means the host refused, the popup-blocked case), `release` frees
/// the resource.
pub trait DocumentSink: Send + Sync {
    fn stage(&self, document: Document) -> DocumentHandle;
    fn open(&self, handle: DocumentHandle) -> bool;
    fn release(&self, handle: DocumentHandle);
}
