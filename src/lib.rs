//! Recruiter console: job board, scored-application dashboard and interview
//! schedule, all driving the recruiting backend over its JSON API.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod jobs;
pub mod model;
pub mod retry;
pub mod schedule;
pub mod view;
pub mod viewer;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{BackendClient, RecruiterApi};
pub use config::ConfigManager;
pub use dashboard::DashboardController;
pub use error::ApiError;
pub use schedule::ScheduleController;
pub use viewer::ResumeViewer;
